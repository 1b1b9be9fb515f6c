//! The four extraction operations, each implemented once per document variant.

pub mod images;
pub mod links;
pub mod tables;
pub mod text;

pub use images::extract_images;
pub use links::extract_links;
pub use tables::extract_tables;
pub use text::extract_text;

use std::path::Path;

use log::warn;

use crate::backend::{LayoutBackend, LayoutSession};

/// Collapse every whitespace run to one space and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Open a layout session on `path`; a missing or failing backend yields `None`.
pub(crate) fn open_session(
    layout: Option<&dyn LayoutBackend>,
    path: &Path,
) -> Option<Box<dyn LayoutSession>> {
    let backend = layout?;
    match backend.open(path) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("{} could not open {}: {}", backend.name(), path.display(), e);
            None
        }
    }
}

/// Layout-aware page text for the raw text backend. Owns the session for
/// one extraction call, so the file is released when the call returns.
pub(crate) struct PageTextSource {
    session: Option<Box<dyn LayoutSession>>,
}

impl PageTextSource {
    pub(crate) fn new(session: Option<Box<dyn LayoutSession>>) -> Self {
        Self { session }
    }

    /// Layout-aware text of a page (0-based), `None` when unavailable or failed.
    pub(crate) fn layout_text(&mut self, page: usize) -> Option<String> {
        let session = self.session.as_mut()?;
        if page >= session.page_count() {
            return None;
        }
        match session.layout_text(page) {
            Ok(text) => text,
            Err(e) => {
                warn!("layout text failed on page {}: {}", page + 1, e);
                None
            }
        }
    }
}
