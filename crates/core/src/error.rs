//! Error types for document loading and content extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading documents or extracting content.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The document handed to an extraction operation is not one the engine understands.
    #[error("Unsupported file type for {operation} extraction: {kind}")]
    UnsupportedDocument {
        /// Operation that was attempted ("text", "links", "images", "tables").
        operation: &'static str,
        /// Kind reported by the loader that produced the document.
        kind: String,
    },

    /// The path does not carry an extension the loader accepts.
    #[error("Invalid file type for {loader}: {path}")]
    InvalidFileType {
        /// Name of the rejecting loader.
        loader: &'static str,
        /// Offending path.
        path: PathBuf,
    },

    /// The input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// Failed to parse the document structure.
    #[error("Parsing error: {0}")]
    Parse(String),

    /// ZIP archive error (for DOCX/PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (for DOCX/PPTX).
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// PDF object model error.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// OLE/CFB container error (for PPT).
    #[error("OLE/CFB error: {0}")]
    Cfb(String),

    /// A secondary backend failed.
    #[error("{backend} failed: {message}")]
    Backend {
        /// Backend name.
        backend: String,
        /// Failure description.
        message: String,
    },
}

impl Error {
    /// Build a backend failure.
    pub fn backend(backend: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error was raised by a loader rather than by the engine.
    pub fn is_loader_error(&self) -> bool {
        !matches!(self, Self::UnsupportedDocument { .. } | Self::Backend { .. })
    }
}
