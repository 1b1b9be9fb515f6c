//! `DataExtractor`: load a file, then run one extraction operation on it.

use std::path::Path;

use crate::backend::LayoutBackend;
use crate::error::Result;
use crate::extract;
use crate::extraction::Extraction;
use crate::loader::Loader;
use crate::records::{ImageRecord, LinkRecord, TableEntry, TextRecord};

/// Runs the four extraction operations against files opened by one loader.
///
/// Every operation loads the file afresh; loader errors propagate unchanged.
pub struct DataExtractor {
    loader: Box<dyn Loader>,
    layout: Option<Box<dyn LayoutBackend>>,
}

impl DataExtractor {
    /// Create an extractor without a layout backend.
    pub fn new(loader: Box<dyn Loader>) -> Self {
        Self {
            loader,
            layout: None,
        }
    }

    /// Use a layout backend for layout-aware page text and page tables.
    pub fn with_layout_backend(mut self, backend: Box<dyn LayoutBackend>) -> Self {
        self.layout = Some(backend);
        self
    }

    /// The loader this extractor opens files with.
    pub fn loader(&self) -> &dyn Loader {
        self.loader.as_ref()
    }

    fn layout(&self) -> Option<&dyn LayoutBackend> {
        self.layout.as_deref()
    }

    /// Extract text records.
    pub fn extract_text(&self, path: &Path) -> Result<Extraction<TextRecord>> {
        let document = self.loader.load_file(path)?;
        extract::extract_text(&document, self.layout())
    }

    /// Extract link records.
    pub fn extract_links(&self, path: &Path) -> Result<Extraction<LinkRecord>> {
        let document = self.loader.load_file(path)?;
        extract::extract_links(&document, self.layout())
    }

    /// Extract image records.
    pub fn extract_images(&self, path: &Path) -> Result<Extraction<ImageRecord>> {
        let document = self.loader.load_file(path)?;
        extract::extract_images(&document)
    }

    /// Extract table entries.
    pub fn extract_tables(&self, path: &Path) -> Result<Extraction<TableEntry>> {
        let document = self.loader.load_file(path)?;
        extract::extract_tables(&document, path, self.layout())
    }
}
