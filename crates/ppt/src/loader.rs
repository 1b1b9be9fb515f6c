//! `Loader` implementation for `.ppt` files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use docex_core::loader::{check_path, has_extension};
use docex_core::{Document, Loader, Result};

use crate::parser::PptParser;

/// Opens PowerPoint 97-2003 presentations into text-only slide decks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptLoader;

impl PptLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for PptLoader {
    fn name(&self) -> &'static str {
        "PptLoader"
    }

    fn validate_file(&self, path: &Path) -> bool {
        has_extension(path, &["ppt"])
    }

    fn load_file(&self, path: &Path) -> Result<Document> {
        check_path(self, path)?;
        log::info!("Loading PPT: {}", path.display());

        let file = File::open(path)?;
        let deck = PptParser::new().parse(BufReader::new(file))?;
        Ok(Document::from(deck))
    }
}
