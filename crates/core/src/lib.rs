//! Document model, variant dispatch and the text, link, image and table
//! extraction engine.
//!
//! Loaders (in sibling crates) open a file into a [`Document`]; the
//! [`extract`] functions project it into normalized, serializable records.

pub mod backend;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod extract;
pub mod extraction;
pub mod extractor;
pub mod loader;
pub mod model;
pub mod records;
pub mod reflow;
pub mod shapes;
pub mod style;

#[cfg(test)]
mod testing;

pub use backend::{DetectedCell, LayoutBackend, LayoutSession};
pub use dispatch::{route, DataKind, Route};
pub use document::{Document, DocumentVariant, ForeignDocument};
pub use error::{Error, Result};
pub use extraction::{encode_blob, Extraction};
pub use extractor::DataExtractor;
pub use loader::Loader;
pub use records::{
    ImageRecord, LinkRecord, ParagraphRecord, RunRecord, ShapeRecord, SpanRecord, TableEntry,
    TableRecord, TextRecord, DEFAULT_COLOR, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE_PT,
};
pub use reflow::merge_lines;
pub use style::infer_font_style;
