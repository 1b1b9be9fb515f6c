//! Secondary layout backend used for layout-aware page text and table detection.

use std::path::Path;

use crate::error::Result;

/// A table cell as detected by a layout backend; `None` for cells with no text.
pub type DetectedCell = Option<String>;

/// A backend that can reopen a page-stream file for layout analysis.
pub trait LayoutBackend {
    /// Backend name used in warnings, e.g. `pdf-extract`.
    fn name(&self) -> &str;

    /// Open the file. The returned session releases the file data when dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn LayoutSession>>;
}

/// An open layout analysis of one file.
pub trait LayoutSession {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Layout-aware text of a page (0-based), `None` when the backend has none.
    fn layout_text(&mut self, page: usize) -> Result<Option<String>>;

    /// The single most prominent table of a page (0-based), if one is detected.
    fn extract_table(&mut self, page: usize) -> Result<Option<Vec<Vec<DetectedCell>>>>;
}
