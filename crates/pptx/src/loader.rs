//! `Loader` implementation for `.pptx` files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use docex_core::loader::{check_path, has_extension};
use docex_core::{Document, Loader, Result};

use crate::parser::PptxParser;

/// Opens PowerPoint 2007+ presentations into slide decks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxLoader;

impl PptxLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for PptxLoader {
    fn name(&self) -> &'static str {
        "PptxLoader"
    }

    fn validate_file(&self, path: &Path) -> bool {
        has_extension(path, &["pptx"])
    }

    fn load_file(&self, path: &Path) -> Result<Document> {
        check_path(self, path)?;
        log::info!("Loading PPTX: {}", path.display());

        let file = File::open(path)?;
        let deck = PptxParser::new().parse(BufReader::new(file))?;
        Ok(Document::from(deck))
    }
}
