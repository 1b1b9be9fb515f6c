//! Content-stream text extraction: text operators to positioned spans.

use std::collections::BTreeMap;

use docex_core::model::{Line, Point, Rect, Span};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::objects::{as_dict, get_resolved, name, number};

/// `TJ` adjustments beyond this (thousandths of an em) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

// span flag bits
const FLAG_ITALIC: u32 = 2;
const FLAG_SERIF: u32 = 4;
const FLAG_MONOSPACE: u32 = 8;
const FLAG_BOLD: u32 = 16;

/// A font resource of a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontInfo {
    /// BaseFont without a subset prefix.
    pub base_font: String,
    /// Span flags derived from the font descriptor and name.
    pub flags: u32,
}

impl FontInfo {
    /// Describe a font dictionary.
    pub fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
        let base_font = get_resolved(doc, dict, b"BaseFont")
            .and_then(name)
            .map(|n| strip_subset_prefix(&n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let descriptor_flags = font_descriptor(doc, dict)
            .and_then(|fd| get_resolved(doc, fd, b"Flags"))
            .and_then(number)
            .map(|f| f as u32)
            .unwrap_or(0);

        Self {
            flags: span_flags(descriptor_flags, &base_font),
            base_font,
        }
    }
}

/// The font descriptor of a simple font, or of the descendant of a Type0 font.
fn font_descriptor<'a>(doc: &'a Document, font: &'a Dictionary) -> Option<&'a Dictionary> {
    if let Some(fd) = font.get(b"FontDescriptor").ok().and_then(|o| as_dict(doc, o)) {
        return Some(fd);
    }
    let descendants = get_resolved(doc, font, b"DescendantFonts")?.as_array().ok()?;
    let descendant = as_dict(doc, descendants.first()?)?;
    descendant
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| as_dict(doc, o))
}

/// `ABCDEF+Helvetica` names a subset of `Helvetica`.
fn strip_subset_prefix(base_font: &str) -> &str {
    match base_font.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => base_font,
    }
}

/// Map PDF font descriptor flags to span flags, completed by name hints.
pub fn span_flags(descriptor_flags: u32, base_font: &str) -> u32 {
    let lower = base_font.to_lowercase();
    let mut flags = 0;
    if descriptor_flags & 64 != 0 || lower.contains("italic") || lower.contains("oblique") {
        flags |= FLAG_ITALIC;
    }
    if descriptor_flags & 2 != 0 {
        flags |= FLAG_SERIF;
    }
    if descriptor_flags & 1 != 0 {
        flags |= FLAG_MONOSPACE;
    }
    if descriptor_flags & (1 << 18) != 0 || lower.contains("bold") || lower.contains("black") {
        flags |= FLAG_BOLD;
    }
    flags
}

/// 2D affine matrix `[a b c d e f]`.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m` followed by `n`.
fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translate(m: &Matrix, tx: f32, ty: f32) -> Matrix {
    multiply(&[1.0, 0.0, 0.0, 1.0, tx, ty], m)
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(m)
}

/// Pack color components in `0.0..=1.0` as `0xRRGGBB`.
fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

fn fill_color(operands: &[Object]) -> Option<u32> {
    let values: Vec<f32> = operands.iter().filter_map(number).collect();
    match values.as_slice() {
        [gray] => Some(pack_rgb(*gray, *gray, *gray)),
        [r, g, b] => Some(pack_rgb(*r, *g, *b)),
        [c, m, y, k] => Some(pack_rgb(
            (1.0 - c) * (1.0 - k),
            (1.0 - m) * (1.0 - k),
            (1.0 - y) * (1.0 - k),
        )),
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: u32,
}

/// Interprets the text operators of one content stream.
struct TextInterpreter<'a> {
    doc: &'a Document,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    infos: BTreeMap<Vec<u8>, FontInfo>,
    page_height: f32,
    gstate: GraphicsState,
    saved: Vec<GraphicsState>,
    font: Vec<u8>,
    size: f32,
    leading: f32,
    tm: Matrix,
    tlm: Matrix,
    spans: Vec<Span>,
}

impl<'a> TextInterpreter<'a> {
    fn new(
        doc: &'a Document,
        fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
        page_height: f32,
    ) -> Self {
        let infos = fonts
            .iter()
            .map(|(key, dict)| (key.clone(), FontInfo::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            infos,
            page_height,
            gstate: GraphicsState {
                ctm: IDENTITY,
                fill: 0,
            },
            saved: Vec::new(),
            font: Vec::new(),
            size: 12.0,
            leading: 0.0,
            tm: IDENTITY,
            tlm: IDENTITY,
            spans: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.saved.push(self.gstate.clone()),
            "Q" => {
                if let Some(state) = self.saved.pop() {
                    self.gstate = state;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(operands) {
                    self.gstate.ctm = multiply(&m, &self.gstate.ctm);
                }
            }
            "g" | "rg" | "k" | "sc" | "scn" => {
                if let Some(color) = fill_color(operands) {
                    self.gstate.fill = color;
                }
            }
            "BT" => {
                self.tm = IDENTITY;
                self.tlm = IDENTITY;
            }
            "Tf" => {
                if let [Object::Name(font), size, ..] = operands {
                    self.font = font.clone();
                    self.size = number(size).unwrap_or(self.size);
                }
            }
            "TL" => self.leading = operands.first().and_then(number).unwrap_or(self.leading),
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(number),
                    operands.get(1).and_then(number),
                ) {
                    if op.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.move_line(0.0, -self.leading),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            "'" | "\"" => {
                self.move_line(0.0, -self.leading);
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(index) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = translate(&self.tlm, tx, ty);
        self.tm = self.tlm;
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if let Some(font) = self.fonts.get(&self.font) {
            if let Ok(encoding) = font.get_font_encoding(self.doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        crate::objects::decode_text_string(bytes)
    }

    fn decode_array(&self, items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(bytes)),
                other => {
                    let adjustment = -number(other).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        let trm = multiply(&self.tm, &self.gstate.ctm);
        let scale = trm[2].hypot(trm[3]);
        let size = if scale > 0.0 { self.size * scale } else { self.size };
        let glyphs = text.chars().count() as f32;
        let width = glyphs * size * AVERAGE_GLYPH_WIDTH;
        self.tm = translate(&self.tm, glyphs * self.size * AVERAGE_GLYPH_WIDTH, 0.0);

        if text.trim().is_empty() {
            return;
        }
        let x = trm[4];
        let y = self.page_height - trm[5];
        let info = self.infos.get(&self.font).cloned().unwrap_or_default();

        let mut span = Span::new(text, info.base_font, size);
        span.flags = info.flags;
        span.color = self.gstate.fill;
        span.origin = Point { x, y };
        span.bbox = Rect::new(x, y - size, x + width, y);
        self.spans.push(span);
    }
}

/// Group spans into lines by baseline, keeping content order.
pub fn group_lines(spans: Vec<Span>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for span in spans {
        let tolerance = (span.size * 0.3).max(1.0);
        match lines.last_mut() {
            Some(line)
                if line
                    .spans
                    .last()
                    .is_some_and(|last| (last.origin.y - span.origin.y).abs() <= tolerance) =>
            {
                line.spans.push(span)
            }
            _ => lines.push(Line::new(vec![span])),
        }
    }
    lines
}

/// Text lines of a page, in top-left page coordinates.
pub fn page_lines(doc: &Document, page_id: ObjectId, page_height: f32) -> lopdf::Result<Vec<Line>> {
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    let fonts = doc.get_page_fonts(page_id)?;

    let mut interpreter = TextInterpreter::new(doc, &fonts, page_height);
    for op in &content.operations {
        interpreter.apply(op);
    }
    Ok(group_lines(interpreter.spans))
}
