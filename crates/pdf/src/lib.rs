//! PDF loaders and layout backend.
//!
//! - [`PdfLoader`] opens a file with lopdf into a page stream: metadata,
//!   text spans, link annotations and image objects.
//! - [`PdfPagesLoader`] opens a file with lopdf into raw per-page text.
//! - [`PdfExtractBackend`] reopens a file with pdf-extract for layout text
//!   and table detection.

pub mod content;
pub mod layout;
pub mod loader;
pub mod objects;
pub mod page_stream;
pub mod table_detector;

pub use layout::PdfExtractBackend;
pub use loader::{PdfLoader, PdfPagesLoader};
pub use table_detector::TableConfig;

#[cfg(test)]
mod testing;
