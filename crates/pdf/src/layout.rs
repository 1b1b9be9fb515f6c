//! pdf-extract as a layout backend.

use std::path::Path;

use docex_core::{DetectedCell, Error, LayoutBackend, LayoutSession, Result};

use crate::table_detector::{detect_table, TableConfig};

const BACKEND_NAME: &str = "pdf-extract";

/// Reopens PDF files with pdf-extract for layout text and table detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend {
    config: TableConfig,
}

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom table detection thresholds.
    pub fn with_table_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }
}

impl LayoutBackend for PdfExtractBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn open(&self, path: &Path) -> Result<Box<dyn LayoutSession>> {
        let pages = extract_pages(path)?;
        log::debug!("{} opened {} ({} pages)", BACKEND_NAME, path.display(), pages.len());
        Ok(Box::new(PageTexts::new(pages, self.config)))
    }
}

/// Layout text of every page, via pdf-extract.
///
/// pdf-extract panics on some malformed inputs; a panic is reported as a
/// backend failure.
pub(crate) fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes)) {
        Ok(result) => result.map_err(|e| Error::backend(BACKEND_NAME, e)),
        Err(_) => Err(Error::backend(BACKEND_NAME, "panicked while reading the document")),
    }
}

/// Page texts held for the lifetime of a session.
#[derive(Debug)]
pub struct PageTexts {
    pages: Vec<String>,
    config: TableConfig,
}

impl PageTexts {
    pub fn new(pages: Vec<String>, config: TableConfig) -> Self {
        Self { pages, config }
    }
}

impl LayoutSession for PageTexts {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn layout_text(&mut self, page: usize) -> Result<Option<String>> {
        Ok(self
            .pages
            .get(page)
            .filter(|text| !text.trim().is_empty())
            .cloned())
    }

    fn extract_table(&mut self, page: usize) -> Result<Option<Vec<Vec<DetectedCell>>>> {
        Ok(self
            .pages
            .get(page)
            .and_then(|text| detect_table(text, &self.config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_layout_text() {
        let mut session = PageTexts::new(
            vec!["First page".to_string(), "  \n".to_string()],
            TableConfig::default(),
        );
        assert_eq!(session.page_count(), 2);
        assert_eq!(session.layout_text(0).unwrap().as_deref(), Some("First page"));
        assert_eq!(session.layout_text(1).unwrap(), None);
        assert_eq!(session.layout_text(5).unwrap(), None);
    }

    #[test]
    fn test_session_extract_table() {
        let mut session = PageTexts::new(
            vec!["Col A   Col B\n1       2\n3       4".to_string()],
            TableConfig::default(),
        );
        let table = session.extract_table(0).unwrap().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[1], vec![Some("1".to_string()), Some("2".to_string())]);
        assert!(session.extract_table(1).unwrap().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let err = PdfExtractBackend::new()
            .open(Path::new("/nonexistent/report.pdf"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_open_garbage_is_backend_error() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::fs::write(file.path(), b"not a pdf at all").unwrap();
        let err = PdfExtractBackend::new().open(file.path()).err().unwrap();
        assert!(matches!(err, Error::Backend { .. }));
        assert_eq!(PdfExtractBackend::new().name(), "pdf-extract");
    }
}
