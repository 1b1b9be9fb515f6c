//! Slide shape-tree parsing (`p:spTree`).

use docex_core::model::{
    Alignment, Broken, ClickAction, Fallible, Fill, Geometry, ImageData, Paragraph, RelTarget,
    Relationships, Run, RunFormat, Shape, ShapeKind, TableGrid, TextFrame,
};
use docex_core::{Error, Result};
use docex_opc::xml::{attr, attr_bool, attr_i64, local_name};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Shape elements that may appear in a shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeTag {
    Sp,
    Pic,
    GraphicFrame,
    GrpSp,
    CxnSp,
    ContentPart,
}

impl ShapeTag {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Sp),
            b"pic" => Some(Self::Pic),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GrpSp),
            b"cxnSp" => Some(Self::CxnSp),
            b"contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

/// Fill declared directly in a shape's `spPr`.
#[derive(Debug, Default)]
enum FillSpec {
    #[default]
    None,
    Solid,
    /// Picture fill and the embed id of its blip, once seen.
    Picture(Option<String>),
    Other,
}

/// A shape whose element is still open.
#[derive(Debug)]
struct ShapeBuilder {
    tag: ShapeTag,
    depth: usize,
    id: Option<u32>,
    name: Option<String>,
    geometry: Option<Geometry>,
    text_body: Option<Vec<Paragraph>>,
    hyperlink: Option<String>,
    fill: FillSpec,
    picture_embed: Option<String>,
    first_blip: Option<String>,
    /// Rows of a table graphic frame; `Some` once the frame declares a table.
    table: Option<Vec<Vec<String>>>,
    has_tbl: bool,
    children: Vec<Shape>,
}

impl ShapeBuilder {
    fn new(tag: ShapeTag, depth: usize) -> Self {
        Self {
            tag,
            depth,
            id: None,
            name: None,
            geometry: None,
            text_body: None,
            hyperlink: None,
            fill: FillSpec::None,
            picture_embed: None,
            first_blip: None,
            table: None,
            has_tbl: false,
            children: Vec::new(),
        }
    }

    fn finish(self, rels: &Relationships) -> Shape {
        let kind = match self.tag {
            ShapeTag::Sp => ShapeKind::AutoShape,
            ShapeTag::Pic => ShapeKind::Picture(load_image(rels, self.picture_embed.as_deref())),
            ShapeTag::GraphicFrame => match self.table {
                Some(rows) if self.has_tbl => ShapeKind::Table(Ok(TableGrid { style: None, rows })),
                Some(_) => ShapeKind::Table(Err(Broken::new("table frame has no a:tbl element"))),
                None => ShapeKind::GraphicFrame,
            },
            ShapeTag::GrpSp => ShapeKind::Group(self.children),
            ShapeTag::CxnSp => ShapeKind::Connector,
            ShapeTag::ContentPart => ShapeKind::Other,
        };
        let fill = match self.fill {
            FillSpec::None => Fill::None,
            FillSpec::Solid => Fill::Solid,
            FillSpec::Picture(embed) => Fill::Picture(load_image(rels, embed.as_deref())),
            FillSpec::Other => Fill::Other,
        };
        let click_action = self.hyperlink.and_then(|r_id| hyperlink_target(rels, &r_id));

        Shape {
            id: self.id,
            name: self.name,
            geometry: self.geometry,
            kind,
            text_frame: self.text_body.map(TextFrame::new),
            text: None,
            click_action,
            fill,
            blip_embed: self.first_blip,
        }
    }
}

/// Click action for a hyperlink relationship id. Jumps to other parts of the
/// presentation carry no address and yield no action.
fn hyperlink_target(rels: &Relationships, r_id: &str) -> Option<ClickAction> {
    let hyperlink = match rels.get(r_id).map(|rel| &rel.target) {
        Some(RelTarget::External(url)) => Ok(url.clone()),
        Some(_) => return None,
        None => Err(Broken(format!("hyperlink relationship '{}' not found", r_id))),
    };
    Some(ClickAction {
        hyperlink: Some(hyperlink),
    })
}

/// Resolve an embedded picture and read its pixel size when the format is decodable.
fn load_image(rels: &Relationships, embed: Option<&str>) -> Fallible<ImageData> {
    let r_id = embed.ok_or_else(|| Broken::new("picture has no embedded image"))?;
    let rel = rels
        .get(r_id)
        .ok_or_else(|| Broken(format!("image relationship '{}' not found", r_id)))?;
    let image = ImageData::new(rel.target_part()?.clone());
    match image::load_from_memory(image.blob()) {
        Ok(decoded) => Ok(image.with_size(decoded.width(), decoded.height())),
        Err(e) => {
            log::debug!("no pixel size for {}: {}", image.part.partname, e);
            Ok(image)
        }
    }
}

#[derive(Debug, Default)]
struct ParagraphBuilder {
    text: String,
    alignment: Option<Alignment>,
    runs: Vec<Run>,
}

/// Event-driven shape-tree builder.
struct TreeParser<'a> {
    rels: &'a Relationships,
    /// Local names of the open elements.
    path: Vec<Vec<u8>>,
    stack: Vec<ShapeBuilder>,
    shapes: Vec<Shape>,
    paragraph: Option<ParagraphBuilder>,
    run: Option<Run>,
    row: Option<Vec<String>>,
    cell: Option<Vec<String>>,
    /// Depth of an `mc:Fallback` being skipped.
    skip_depth: Option<usize>,
}

impl<'a> TreeParser<'a> {
    fn new(rels: &'a Relationships) -> Self {
        Self {
            rels,
            path: Vec::new(),
            stack: Vec::new(),
            shapes: Vec::new(),
            paragraph: None,
            run: None,
            row: None,
            cell: None,
            skip_depth: None,
        }
    }

    fn ancestor(&self, up: usize) -> &[u8] {
        self.path
            .len()
            .checked_sub(up)
            .and_then(|i| self.path.get(i))
            .map(Vec::as_slice)
            .unwrap_or(b"")
    }

    fn open(&mut self, e: &BytesStart<'_>, name: &[u8]) {
        if self.skip_depth.is_some() {
            return;
        }
        let depth = self.path.len();
        let parent = self.ancestor(1).to_vec();
        let grandparent = self.ancestor(2).to_vec();

        if name == b"Fallback" {
            self.skip_depth = Some(depth);
            return;
        }
        if let Some(tag) = ShapeTag::from_local_name(name) {
            if matches!(parent.as_slice(), b"spTree" | b"grpSp" | b"Choice") {
                self.stack.push(ShapeBuilder::new(tag, depth));
                return;
            }
        }

        match name {
            b"p" if parent == b"txBody" => self.paragraph = Some(ParagraphBuilder::default()),
            b"pPr" if parent == b"p" => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.alignment = attr(e, b"algn").as_deref().and_then(Alignment::from_ooxml);
                }
            }
            b"r" if parent == b"p" => self.run = Some(Run::default()),
            b"rPr" if parent == b"r" => {
                if let Some(run) = self.run.as_mut() {
                    run.format = run_format(e);
                }
            }
            b"latin" if parent == b"rPr" => {
                if let Some(run) = self.run.as_mut() {
                    run.format.font = attr(e, b"typeface");
                }
            }
            b"srgbClr" if grandparent == b"rPr" => {
                if let Some(run) = self.run.as_mut() {
                    let value = attr(e, b"val");
                    match parent.as_slice() {
                        b"solidFill" => run.format.color = value,
                        b"highlight" => run.format.highlight = value,
                        _ => {}
                    }
                }
            }
            // A soft line break reads as a vertical tab inside paragraph text.
            b"br" if parent == b"p" => {
                if let Some(para) = self.paragraph.as_mut() {
                    para.text.push('\x0b');
                }
            }
            b"tr" => {
                if self.stack.last().is_some_and(|s| s.table.is_some()) {
                    self.row = Some(Vec::new());
                }
            }
            b"tc" if self.row.is_some() => self.cell = Some(Vec::new()),
            _ => self.open_shape_property(e, name, depth, &parent, &grandparent),
        }
    }

    /// Elements describing the innermost open shape itself.
    fn open_shape_property(
        &mut self,
        e: &BytesStart<'_>,
        name: &[u8],
        depth: usize,
        parent: &[u8],
        grandparent: &[u8],
    ) {
        let Some(shape) = self.stack.last_mut() else {
            return;
        };
        let rel = depth - shape.depth;

        match name {
            b"cNvPr" if rel == 2 => {
                shape.id = attr(e, b"id").and_then(|v| v.parse().ok());
                shape.name = attr(e, b"name");
            }
            b"hlinkClick" if rel == 3 && parent == b"cNvPr" => {
                shape.hyperlink = attr(e, b"id").filter(|id| !id.is_empty());
            }
            b"off" | b"ext"
                if parent == b"xfrm"
                    && matches!(grandparent, b"spPr" | b"grpSpPr" | b"graphicFrame") =>
            {
                let geometry = shape.geometry.get_or_insert_with(Geometry::default);
                if name == b"off" {
                    geometry.left = attr_i64(e, b"x").unwrap_or(0);
                    geometry.top = attr_i64(e, b"y").unwrap_or(0);
                } else {
                    geometry.width = attr_i64(e, b"cx").unwrap_or(0);
                    geometry.height = attr_i64(e, b"cy").unwrap_or(0);
                }
            }
            b"noFill" | b"solidFill" | b"gradFill" | b"pattFill" | b"grpFill" | b"blipFill"
                if rel == 2 && parent == b"spPr" =>
            {
                shape.fill = match name {
                    b"noFill" => FillSpec::None,
                    b"solidFill" => FillSpec::Solid,
                    b"blipFill" => FillSpec::Picture(None),
                    _ => FillSpec::Other,
                };
            }
            b"blip" => {
                let embed = attr(e, b"embed");
                if shape.first_blip.is_none() {
                    shape.first_blip = embed.clone();
                }
                if parent == b"blipFill" {
                    if rel == 2 && shape.tag == ShapeTag::Pic {
                        shape.picture_embed = embed;
                    } else if rel == 3 && grandparent == b"spPr" {
                        shape.fill = FillSpec::Picture(embed);
                    }
                }
            }
            b"txBody" if rel == 1 && shape.tag == ShapeTag::Sp => {
                shape.text_body = Some(Vec::new());
            }
            b"graphicData" => {
                if attr(e, b"uri").is_some_and(|uri| uri.ends_with("/table")) {
                    shape.table = Some(Vec::new());
                }
            }
            b"tbl" if shape.table.is_some() => shape.has_tbl = true,
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        let depth = self.path.len() - 1;
        if let Some(skip) = self.skip_depth {
            if skip == depth {
                self.skip_depth = None;
            }
            return;
        }
        let parent = self.ancestor(2).to_vec();

        match name {
            b"r" if parent == b"p" => {
                if let (Some(run), Some(para)) = (self.run.take(), self.paragraph.as_mut()) {
                    para.runs.push(run);
                }
            }
            b"p" if parent == b"txBody" => {
                let Some(para) = self.paragraph.take() else {
                    return;
                };
                if let Some(cell) = self.cell.as_mut() {
                    cell.push(para.text);
                } else if let Some(body) =
                    self.stack.last_mut().and_then(|s| s.text_body.as_mut())
                {
                    body.push(Paragraph {
                        text: para.text,
                        style: None,
                        alignment: para.alignment,
                        runs: para.runs,
                    });
                }
            }
            b"tc" => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.push(cell.join("\n"));
                }
            }
            b"tr" => {
                if let Some(row) = self.row.take() {
                    if let Some(table) = self.stack.last_mut().and_then(|s| s.table.as_mut()) {
                        table.push(row);
                    }
                }
            }
            _ => {
                let closes_shape = self.stack.last().is_some_and(|s| {
                    s.depth == depth && ShapeTag::from_local_name(name) == Some(s.tag)
                });
                if closes_shape {
                    self.finish_shape();
                }
            }
        }
    }

    fn finish_shape(&mut self) {
        let Some(builder) = self.stack.pop() else {
            return;
        };
        let shape = builder.finish(self.rels);
        match self.stack.last_mut() {
            Some(group) if group.tag == ShapeTag::GrpSp => group.children.push(shape),
            Some(_) => {}
            None => self.shapes.push(shape),
        }
    }

    fn text(&mut self, text: &str) {
        if self.skip_depth.is_some() || self.ancestor(1) != b"t" {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
        if let Some(para) = self.paragraph.as_mut() {
            para.text.push_str(text);
        }
    }
}

/// Run properties from `a:rPr` attributes. `sz` is in hundredths of a point.
fn run_format(e: &BytesStart<'_>) -> RunFormat {
    RunFormat {
        size_pt: attr_i64(e, b"sz").map(|sz| sz as f32 / 100.0),
        bold: attr_bool(e, b"b"),
        italic: attr_bool(e, b"i"),
        underline: attr(e, b"u").map(|u| u != "none"),
        ..Default::default()
    }
}

/// Parse the shape tree of a slide part into top-level shapes.
pub fn parse_shape_tree(xml: &str, rels: &Relationships) -> Result<Vec<Shape>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut parser = TreeParser::new(rels);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e.name().as_ref()).to_vec();
                parser.open(e, &name);
                parser.path.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e.name().as_ref()).to_vec();
                parser.open(e, &name);
                parser.path.push(name.clone());
                parser.close(&name);
                parser.path.pop();
            }
            Ok(Event::End(ref e)) => {
                let name = local_name(e.name().as_ref()).to_vec();
                parser.close(&name);
                parser.path.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::Xml(format!("Error decoding slide text: {}", e)))?;
                parser.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(parser.shapes)
}
