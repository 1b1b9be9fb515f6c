//! Loader interface: validate a path and open it into a [`Document`].

use std::path::Path;

use crate::document::Document;
use crate::error::{Error, Result};

/// Opens files of one container format.
pub trait Loader {
    /// Loader name used in errors, e.g. `PdfLoader`.
    fn name(&self) -> &'static str;

    /// Whether the path carries an extension this loader accepts.
    fn validate_file(&self, path: &Path) -> bool;

    /// Open the file into an in-memory document.
    fn load_file(&self, path: &Path) -> Result<Document>;
}

/// Whether the path extension matches one of `extensions` (lowercase, no dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The checks every loader runs before opening: extension first, then existence.
pub fn check_path<L: Loader + ?Sized>(loader: &L, path: &Path) -> Result<()> {
    if !loader.validate_file(path) {
        return Err(Error::InvalidFileType {
            loader: loader.name(),
            path: path.to_path_buf(),
        });
    }
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}
