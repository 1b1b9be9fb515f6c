//! `Loader` implementation for `.docx` files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use docex_core::loader::{check_path, has_extension};
use docex_core::{Document, Loader, Result};

use crate::parser::DocxParser;

/// Opens Word 2007+ documents into flow documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxLoader;

impl DocxLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for DocxLoader {
    fn name(&self) -> &'static str {
        "DocxLoader"
    }

    fn validate_file(&self, path: &Path) -> bool {
        has_extension(path, &["docx"])
    }

    fn load_file(&self, path: &Path) -> Result<Document> {
        check_path(self, path)?;
        log::info!("Loading DOCX: {}", path.display());

        let file = File::open(path)?;
        let doc = DocxParser::new().parse(BufReader::new(file))?;
        Ok(Document::from(doc))
    }
}
