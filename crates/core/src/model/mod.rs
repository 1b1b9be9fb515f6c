//! In-memory document models produced by loaders.

pub mod flow;
pub mod page;
pub mod parts;
pub mod slides;

pub use flow::{Alignment, Drawing, FlowDocument, InlineShape, Paragraph, Run, RunFormat, TableGrid};
pub use page::{
    Block, EmbeddedImage, Line, LinkAnnotation, LinkKind, Page, PageCollection, PageStream,
    Point, RawPageText, Rect, Span,
};
pub use parts::{Broken, Fallible, ImageData, Part, RelTarget, Relationship, Relationships};
pub use slides::{ClickAction, Fill, Geometry, Shape, ShapeKind, Slide, SlideDeck, TextFrame};
