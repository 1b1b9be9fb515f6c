//! Main document part (`w:body`) parsing.

use docex_core::model::{Alignment, Drawing, InlineShape, Paragraph, Run, TableGrid};
use docex_core::{Error, Result};
use docex_opc::xml::{attr, attr_i64, local_name, parse_on_off};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::styles::StyleTable;

/// Content of a document body.
#[derive(Debug, Default)]
pub struct Body {
    /// Paragraphs that are direct children of the body.
    pub paragraphs: Vec<Paragraph>,
    /// Tables that are direct children of the body.
    pub tables: Vec<TableGrid>,
    /// Every `wp:inline`, in document order.
    pub inline_shapes: Vec<InlineShape>,
    /// Every `w:drawing`, in document order.
    pub drawings: Vec<Drawing>,
}

#[derive(Debug)]
struct OpenParagraph {
    depth: usize,
    text: String,
    style_id: Option<String>,
    alignment: Option<Alignment>,
    runs: Vec<Run>,
}

#[derive(Debug)]
struct OpenTable {
    depth: usize,
    style_id: Option<String>,
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    cell: Option<Vec<String>>,
}

struct BodyParser<'a> {
    styles: &'a StyleTable,
    path: Vec<Vec<u8>>,
    body: Body,
    paragraph: Option<OpenParagraph>,
    /// The open run and its depth.
    run: Option<(usize, Run)>,
    table: Option<OpenTable>,
    /// Depth of the open `w:drawing` and of the `wp:inline` inside it.
    drawing: Option<usize>,
    inline: Option<usize>,
}

impl<'a> BodyParser<'a> {
    fn new(styles: &'a StyleTable) -> Self {
        Self {
            styles,
            path: Vec::new(),
            body: Body::default(),
            paragraph: None,
            run: None,
            table: None,
            drawing: None,
            inline: None,
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

    /// Whether a paragraph opening at `depth` is one we collect: a body
    /// paragraph or a paragraph directly inside a cell of a body table.
    fn collects_paragraph(&self, depth: usize, parent: &[u8]) -> bool {
        match &self.table {
            None => parent == b"body",
            Some(table) => parent == b"tc" && depth == table.depth + 3 && table.cell.is_some(),
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, name: &[u8]) {
        let depth = self.path.len();
        let parent = self.ancestor(1).to_vec();

        if self.drawing.is_some() {
            self.open_drawing_child(e, name, depth, &parent);
            return;
        }

        match name {
            b"drawing" => {
                self.drawing = Some(depth);
                self.body.drawings.push(Drawing::default());
            }
            b"tbl" if parent == b"body" => {
                self.table = Some(OpenTable {
                    depth,
                    style_id: None,
                    rows: Vec::new(),
                    row: None,
                    cell: None,
                });
            }
            b"tblStyle" => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 2) {
                    table.style_id = attr(e, b"val");
                }
            }
            b"tr" => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 1) {
                    table.row = Some(Vec::new());
                }
            }
            b"tc" => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 2) {
                    table.cell = Some(Vec::new());
                }
            }
            b"p" if self.paragraph.is_none() && self.collects_paragraph(depth, &parent) => {
                self.paragraph = Some(OpenParagraph {
                    depth,
                    text: String::new(),
                    style_id: None,
                    alignment: None,
                    runs: Vec::new(),
                });
            }
            _ => self.open_paragraph_child(e, name, depth, &parent),
        }
    }

    fn open_paragraph_child(
        &mut self,
        e: &BytesStart<'_>,
        name: &[u8],
        depth: usize,
        parent: &[u8],
    ) {
        let Some(para) = self.paragraph.as_mut() else {
            return;
        };
        let rel = depth - para.depth;

        match name {
            b"pStyle" if rel == 2 && parent == b"pPr" => para.style_id = attr(e, b"val"),
            b"jc" if rel == 2 && parent == b"pPr" => {
                para.alignment = attr(e, b"val").as_deref().and_then(Alignment::from_ooxml);
            }
            b"r" if rel == 1 || (rel == 2 && parent == b"hyperlink") => {
                self.run = Some((depth, Run::default()));
            }
            _ => {
                let Some((run_depth, run)) = self.run.as_mut() else {
                    return;
                };
                let in_rpr = parent == b"rPr" && depth == *run_depth + 2;
                let format = &mut run.format;
                match name {
                    b"b" if in_rpr => format.bold = Some(toggle(e)),
                    b"i" if in_rpr => format.italic = Some(toggle(e)),
                    b"u" if in_rpr => format.underline = attr(e, b"val").map(|u| u != "none"),
                    // half-points
                    b"sz" if in_rpr => format.size_pt = attr_i64(e, b"val").map(|v| v as f32 / 2.0),
                    b"color" if in_rpr => {
                        format.color = attr(e, b"val").filter(|c| c != "auto");
                    }
                    b"highlight" if in_rpr => {
                        format.highlight = attr(e, b"val").filter(|h| h != "none");
                    }
                    b"rFonts" if in_rpr => format.font = attr(e, b"ascii"),
                    b"tab" if depth == *run_depth + 1 => {
                        run.text.push('\t');
                        para.text.push('\t');
                    }
                    b"br" | b"cr" if depth == *run_depth + 1 => {
                        run.text.push('\n');
                        para.text.push('\n');
                    }
                    _ => {}
                }
            }
        }
    }

    fn open_drawing_child(&mut self, e: &BytesStart<'_>, name: &[u8], depth: usize, parent: &[u8]) {
        match name {
            b"anchor" => {
                if let Some(drawing) = self.body.drawings.last_mut() {
                    drawing.anchored = true;
                }
            }
            b"inline" if self.inline.is_none() => {
                self.inline = Some(depth);
                self.body.inline_shapes.push(InlineShape::default());
            }
            b"docPr" | b"extent" if self.inline.is_some() && parent == b"inline" => {
                if let Some(shape) = self.body.inline_shapes.last_mut() {
                    if name == b"docPr" {
                        shape.name = attr(e, b"name");
                    } else {
                        shape.width = attr_i64(e, b"cx");
                        shape.height = attr_i64(e, b"cy");
                    }
                }
            }
            b"blip" => {
                let embed = attr(e, b"embed");
                if let Some(drawing) = self.body.drawings.last_mut() {
                    if drawing.embed.is_none() {
                        drawing.embed = embed.clone();
                    }
                }
                if self.inline.is_some() && parent == b"blipFill" {
                    if let Some(shape) = self.body.inline_shapes.last_mut() {
                        if shape.embed.is_none() {
                            shape.embed = embed;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        let depth = self.path.len() - 1;

        if self.drawing == Some(depth) {
            self.drawing = None;
            self.inline = None;
            return;
        }
        if self.inline == Some(depth) {
            self.inline = None;
            return;
        }
        if self.drawing.is_some() {
            return;
        }

        match name {
            b"r" if self.run.as_ref().is_some_and(|(d, _)| *d == depth) => {
                if let (Some((_, run)), Some(para)) = (self.run.take(), self.paragraph.as_mut()) {
                    // Runs inside a hyperlink add to the text only.
                    if depth == para.depth + 1 {
                        para.runs.push(run);
                    }
                }
            }
            b"p" if self.paragraph.as_ref().is_some_and(|p| p.depth == depth) => {
                let Some(para) = self.paragraph.take() else {
                    return;
                };
                match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
                    Some(cell) => cell.push(para.text),
                    None => self.body.paragraphs.push(Paragraph {
                        text: para.text,
                        style: self.styles.paragraph_style(para.style_id.as_deref()),
                        alignment: para.alignment,
                        runs: para.runs,
                    }),
                }
            }
            b"tc" => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 2) {
                    if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                        row.push(cell.join("\n"));
                    }
                }
            }
            b"tr" => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 1) {
                    if let Some(row) = table.row.take() {
                        table.rows.push(row);
                    }
                }
            }
            b"tbl" if self.table.as_ref().is_some_and(|t| t.depth == depth) => {
                if let Some(table) = self.table.take() {
                    self.body.tables.push(TableGrid {
                        style: table.style_id.map(|id| self.styles.name(&id)),
                        rows: table.rows,
                    });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.drawing.is_some() || self.ancestor(1) != b"t" {
            return;
        }
        let depth = self.path.len() - 1;
        let (Some((run_depth, run)), Some(para)) = (self.run.as_mut(), self.paragraph.as_mut())
        else {
            return;
        };
        if depth == *run_depth + 1 {
            run.text.push_str(text);
            para.text.push_str(text);
        }
    }
}

/// A `w:b`-style toggle: present without `w:val` means on.
fn toggle(e: &BytesStart<'_>) -> bool {
    attr(e, b"val")
        .and_then(|v| parse_on_off(&v))
        .unwrap_or(true)
}

/// Parse the main document part.
pub fn parse_body(xml: &str, styles: &StyleTable) -> Result<Body> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut parser = BodyParser::new(styles);

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
                    .map_err(|e| Error::Xml(format!("Error decoding document text: {}", e)))?;
                parser.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing document: {}", e)));
            }
            _ => {}
        }
    }

    Ok(parser.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::document_xml;

    #[test]
    fn test_paragraphs_and_runs() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:rPr>
                <w:rFonts w:ascii="Calibri"/><w:b/><w:i w:val="0"/><w:u w:val="single"/>
                <w:sz w:val="28"/><w:color w:val="FF0000"/><w:highlight w:val="yellow"/></w:rPr>
                <w:t xml:space="preserve">Hello </w:t></w:r><w:hyperlink r:id="rId9"><w:r>
                <w:t>world</w:t></w:r></w:hyperlink></w:p>
            <w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#,
        );
        let body = parse_body(&xml, &StyleTable::default()).unwrap();
        assert_eq!(body.paragraphs.len(), 2);

        let heading = &body.paragraphs[0];
        assert_eq!(heading.text, "Hello world");
        assert_eq!(heading.style.as_deref(), Some("Heading1"));
        assert_eq!(heading.alignment, Some(Alignment::Center));
        assert_eq!(heading.runs.len(), 1);
        let format = &heading.runs[0].format;
        assert_eq!(format.font.as_deref(), Some("Calibri"));
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.italic, Some(false));
        assert_eq!(format.underline, Some(true));
        assert_eq!(format.size_pt, Some(14.0));
        assert_eq!(format.color.as_deref(), Some("FF0000"));
        assert_eq!(format.highlight.as_deref(), Some("yellow"));
        assert_eq!(heading.runs[0].text, "Hello ");

        assert_eq!(body.paragraphs[1].text, "a\tb\nc");
        assert_eq!(body.paragraphs[1].style, None);
    }

    #[test]
    fn test_hyperlink_runs_are_text_only() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink r:id="rId9"><w:r>
                <w:rPr><w:b/></w:rPr><w:t>docs</w:t></w:r></w:hyperlink><w:r>
                <w:t xml:space="preserve"> now</w:t></w:r></w:p>"#,
        );
        let body = parse_body(&xml, &StyleTable::default()).unwrap();
        let para = &body.paragraphs[0];

        assert_eq!(para.text, "See docs now");
        let runs: Vec<&str> = para.runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(runs, vec!["See ", " now"]);
        assert!(para.runs.iter().all(|r| r.format.bold.is_none()));
    }

    #[test]
    fn test_tables_keep_cell_paragraphs_out_of_body() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p>
            <w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tblGrid>
            <w:gridCol w:w="100"/></w:tblGrid>
              <w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r>
              <w:t>Grade</w:t></w:r></w:p><w:p><w:r><w:t>(final)</w:t></w:r></w:p></w:tc></w:tr>
              <w:tr><w:tc><w:p><w:r><w:t>Alice</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r>
              <w:t>nested</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:tc><w:tc><w:p/></w:tc></w:tr>
            </w:tbl>
            <w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        let body = parse_body(&xml, &StyleTable::default()).unwrap();

        let texts: Vec<_> = body.paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Before", "After"]);
        assert_eq!(body.tables.len(), 1);
        assert_eq!(body.tables[0].style.as_deref(), Some("TableGrid"));
        assert_eq!(
            body.tables[0].rows,
            vec![vec!["Name", "Grade\n(final)"], vec!["Alice", ""]]
        );
    }

    #[test]
    fn test_inline_shapes_and_drawings() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Logo:</w:t><w:drawing><wp:inline><wp:extent cx="914400" cy="457200"/>
                <wp:docPr id="1" name="Picture 1"/><a:graphic><a:graphicData><pic:pic><pic:blipFill>
                <a:blip r:embed="rId4"/></pic:blipFill></pic:pic></a:graphicData></a:graphic>
                </wp:inline></w:drawing></w:r></w:p>
            <w:p><w:r><w:drawing><wp:anchor><wp:docPr id="2" name="Float"/><a:graphic>
            <a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId5"/></pic:blipFill></pic:pic>
            </a:graphicData></a:graphic></wp:anchor></w:drawing></w:r></w:p>
            <w:p><w:r><w:drawing><wp:inline><wp:docPr id="3" name="Chart"/><a:graphic>
            <a:graphicData/></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        );
        let body = parse_body(&xml, &StyleTable::default()).unwrap();

        assert_eq!(body.paragraphs[0].text, "Logo:");
        assert_eq!(body.inline_shapes.len(), 2);
        let first = &body.inline_shapes[0];
        assert_eq!(first.name.as_deref(), Some("Picture 1"));
        assert_eq!(first.embed.as_deref(), Some("rId4"));
        assert_eq!((first.width, first.height), (Some(914400), Some(457200)));
        assert_eq!(body.inline_shapes[1].embed, None);

        assert_eq!(body.drawings.len(), 3);
        assert_eq!(body.drawings[0].embed.as_deref(), Some("rId4"));
        assert!(!body.drawings[0].anchored);
        assert_eq!(body.drawings[1].embed.as_deref(), Some("rId5"));
        assert!(body.drawings[1].anchored);
        assert_eq!(body.drawings[2].embed, None);
    }

    #[test]
    fn test_text_box_content_is_not_paragraph_text() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Outer</w:t></w:r><w:r><w:drawing><wp:anchor><wps:txbx><w:txbxContent>
                <w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:txbxContent></wps:txbx></wp:anchor>
                </w:drawing></w:r></w:p>"#,
        );
        let body = parse_body(&xml, &StyleTable::default()).unwrap();
        assert_eq!(body.paragraphs.len(), 1);
        assert_eq!(body.paragraphs[0].text, "Outer");
    }
}
