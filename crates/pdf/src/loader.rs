//! `Loader` implementations for `.pdf` files.

use std::path::Path;

use docex_core::loader::{check_path, has_extension};
use docex_core::model::{Line, PageCollection, RawPageText};
use docex_core::{Document, Error, Loader, Result};

use crate::content::page_lines;
use crate::page_stream::{media_box, read_page_stream};

fn load_lopdf(path: &Path) -> Result<lopdf::Document> {
    lopdf::Document::load(path).map_err(|e| Error::Pdf(e.to_string()))
}

/// Opens PDF files into page streams: metadata, positioned text spans,
/// link annotations and image objects.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for PdfLoader {
    fn name(&self) -> &'static str {
        "PdfLoader"
    }

    fn validate_file(&self, path: &Path) -> bool {
        has_extension(path, &["pdf"])
    }

    fn load_file(&self, path: &Path) -> Result<Document> {
        check_path(self, path)?;
        log::info!("Loading PDF: {}", path.display());

        let doc = load_lopdf(path)?;
        if doc.is_encrypted() {
            log::warn!("{} is encrypted; text may be unreadable", path.display());
        }
        Ok(Document::from(read_page_stream(&doc)))
    }
}

/// Opens PDF files into raw per-page text read from the content streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPagesLoader;

impl PdfPagesLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for PdfPagesLoader {
    fn name(&self) -> &'static str {
        "PdfPagesLoader"
    }

    fn validate_file(&self, path: &Path) -> bool {
        has_extension(path, &["pdf"])
    }

    fn load_file(&self, path: &Path) -> Result<Document> {
        check_path(self, path)?;
        log::info!("Loading PDF pages: {}", path.display());

        let doc = load_lopdf(path)?;
        Ok(Document::from(PageCollection::new(path, raw_pages(&doc))))
    }
}

/// Raw text of every page in page order. A page whose content stream
/// cannot be decoded is marked failed; a page without text is unavailable.
pub fn raw_pages(doc: &lopdf::Document) -> Vec<RawPageText> {
    doc.get_pages()
        .into_iter()
        .map(|(number, page_id)| {
            match page_lines(doc, page_id, media_box(doc, page_id).y1) {
                Ok(lines) => raw_text(&lines),
                Err(e) => {
                    log::warn!("raw text of page {} unavailable: {}", number, e);
                    RawPageText::Failed(e.to_string())
                }
            }
        })
        .collect()
}

/// One output line per text line, spans joined by a space.
fn raw_text(lines: &[Line]) -> RawPageText {
    let text = lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.trim().is_empty() {
        RawPageText::Unavailable
    } else {
        RawPageText::Text(text)
    }
}
