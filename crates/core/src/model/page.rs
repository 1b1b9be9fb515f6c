//! Page-stream (fixed layout) document model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::parts::Fallible;

/// Axis-aligned rectangle in page units, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Corners as `[x0, y0, x1, y1]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Rectangle width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Rectangle height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A point in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A run of text drawn with one font state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub text: String,
    /// Font family name as reported by the backend (e.g. `Helvetica-Bold`).
    pub font: String,
    pub size: f32,
    pub bbox: Rect,
    /// Raw font flags (superscript 1, italic 2, serif 4, monospace 8, bold 16).
    pub flags: u32,
    pub origin: Point,
    /// Packed sRGB fill color.
    pub color: u32,
    /// Backend-specific keys not covered by the fields above.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Span {
    /// Create a span with the given text, font and size.
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
            ..Default::default()
        }
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// A block of page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Text block made of lines.
    Text(Vec<Line>),
    /// Image placement block.
    Image { bbox: Rect },
}

/// Kind of a link annotation's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    None,
    Goto,
    Uri,
    Launch,
    Named,
    Gotor,
}

/// A link annotation on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub uri: Option<String>,
    /// Source rectangle of the annotation.
    pub rect: Rect,
    pub kind: LinkKind,
}

impl LinkAnnotation {
    /// Create a URI link annotation.
    pub fn uri(uri: impl Into<String>, rect: Rect) -> Self {
        Self {
            uri: Some(uri.into()),
            rect,
            kind: LinkKind::Uri,
        }
    }
}

/// An image object resolved from a cross-reference id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedImage {
    /// Raw stream bytes, exactly as stored.
    pub bytes: Vec<u8>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Declared format, e.g. `jpeg`, `jpx`, `raw`.
    pub ext: Option<String>,
}

/// One fixed-layout page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Rotation in degrees.
    pub rotation: i32,
    pub rect: Rect,
    pub blocks: Vec<Block>,
    pub links: Vec<LinkAnnotation>,
    /// Cross-reference ids of the raster images placed on this page.
    pub images: Vec<u32>,
}

impl Page {
    /// Create an empty page with the given rectangle.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            ..Default::default()
        }
    }

    /// Add a text block made of single-span lines.
    pub fn add_text_lines(&mut self, lines: Vec<Line>) {
        self.blocks.push(Block::Text(lines));
    }
}

/// A page-stream document opened by the primary backend.
#[derive(Debug, Clone, Default)]
pub struct PageStream {
    /// Whole-document metadata exactly as reported by the backend.
    pub metadata: BTreeMap<String, String>,
    pub pages: Vec<Page>,
    /// Image objects keyed by cross-reference id.
    pub images: BTreeMap<u32, Fallible<EmbeddedImage>>,
}

impl PageStream {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Resolve an image object by cross-reference id.
    pub fn extract_image(&self, xref: u32) -> Option<&Fallible<EmbeddedImage>> {
        self.images.get(&xref)
    }
}

/// Raw text of a page as produced by the alternate backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPageText {
    Text(String),
    /// The backend offers no text for this page.
    Unavailable,
    /// The backend failed on this page.
    Failed(String),
}

/// A page-stream document opened by the alternate (raw text) backend.
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    /// Source file, reopened by secondary layout backends.
    pub source: PathBuf,
    pub pages: Vec<RawPageText>,
}

impl PageCollection {
    /// Create a collection for the given source path.
    pub fn new(source: impl Into<PathBuf>, pages: Vec<RawPageText>) -> Self {
        Self {
            source: source.into(),
            pages,
        }
    }
}
