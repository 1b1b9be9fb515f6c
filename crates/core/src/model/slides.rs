//! Slide deck model: slides holding recursive shape trees.

use super::flow::{Paragraph, TableGrid};
use super::parts::{Fallible, ImageData, Relationships};

/// Shape position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

/// What a shape is.
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// A regular shape or text box.
    AutoShape,
    /// A picture and its decoded image.
    Picture(Fallible<ImageData>),
    /// A graphic frame holding a table.
    Table(Fallible<TableGrid>),
    /// A group of child shapes.
    Group(Vec<Shape>),
    /// A graphic frame holding something other than a table (chart, diagram).
    GraphicFrame,
    Connector,
    Other,
}

/// Shape fill.
#[derive(Debug, Clone, Default)]
pub enum Fill {
    #[default]
    None,
    Solid,
    /// Picture fill and its decoded image.
    Picture(Fallible<ImageData>),
    /// Gradient, pattern or group fill.
    Other,
}

/// The text container of a shape.
#[derive(Debug, Clone, Default)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Create a frame from paragraphs.
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Click action of a shape.
#[derive(Debug, Clone, Default)]
pub struct ClickAction {
    /// Hyperlink target, broken when its relationship cannot be resolved.
    pub hyperlink: Option<Fallible<String>>,
}

/// A positioned visual element on a slide.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    pub kind: ShapeKind,
    pub text_frame: Option<TextFrame>,
    /// Bare text for shapes exposing text without a text frame.
    pub text: Option<String>,
    pub click_action: Option<ClickAction>,
    pub fill: Fill,
    /// First embedded-image relationship id found anywhere in the shape markup.
    pub blip_embed: Option<String>,
}

impl Shape {
    /// Create a shape of the given kind with everything else unset.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: None,
            name: None,
            geometry: None,
            kind,
            text_frame: None,
            text: None,
            click_action: None,
            fill: Fill::None,
            blip_embed: None,
        }
    }

    /// A text box holding one plain paragraph.
    pub fn text_box(id: u32, text: impl Into<String>) -> Self {
        Self::new(ShapeKind::AutoShape)
            .with_id(id)
            .with_text_frame(TextFrame::new(vec![Paragraph::plain(text)]))
    }

    /// A picture shape.
    pub fn picture(id: u32, image: Fallible<ImageData>) -> Self {
        Self::new(ShapeKind::Picture(image)).with_id(id)
    }

    /// A table shape.
    pub fn table(id: u32, table: Fallible<TableGrid>) -> Self {
        Self::new(ShapeKind::Table(table)).with_id(id)
    }

    /// A group shape.
    pub fn group(id: u32, children: Vec<Shape>) -> Self {
        Self::new(ShapeKind::Group(children)).with_id(id)
    }

    /// Set the shape id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the geometry.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the text frame.
    pub fn with_text_frame(mut self, frame: TextFrame) -> Self {
        self.text_frame = Some(frame);
        self
    }

    /// Attach a hyperlink click action.
    pub fn with_hyperlink(mut self, target: Fallible<String>) -> Self {
        self.click_action = Some(ClickAction {
            hyperlink: Some(target),
        });
        self
    }

    /// Text of the shape: the text frame's text, or the bare text.
    pub fn text_content(&self) -> Option<String> {
        match &self.text_frame {
            Some(frame) => Some(frame.text()),
            None => self.text.clone(),
        }
    }

    /// Child shapes, when this shape is a group.
    pub fn children(&self) -> Option<&[Shape]> {
        match &self.kind {
            ShapeKind::Group(children) => Some(children),
            _ => None,
        }
    }

    /// Whether the shape is flagged as table-bearing.
    pub fn has_table(&self) -> bool {
        matches!(self.kind, ShapeKind::Table(_))
    }
}

/// One slide.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    /// Top-level shapes in z-order.
    pub shapes: Vec<Shape>,
    /// Relationship table of the slide part.
    pub rels: Relationships,
}

impl Slide {
    /// Create a slide from shapes with an empty relationship table.
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            rels: Relationships::new(),
        }
    }
}

/// A slide deck.
#[derive(Debug, Clone, Default)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// Create a deck from slides.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }
}
