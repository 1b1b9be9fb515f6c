//! Variant dispatch: one match on the document tag per operation call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::model::{FlowDocument, PageCollection, PageStream, SlideDeck};

/// Label of one of the four record sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Text,
    Links,
    Images,
    Tables,
}

impl DataKind {
    /// All kinds, in the order the operations run.
    pub const ALL: [DataKind; 4] = [Self::Text, Self::Links, Self::Images, Self::Tables];

    /// Label used by storage and in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Links => "links",
            Self::Images => "images",
            Self::Tables => "tables",
        }
    }

    /// Operation name used in unsupported-document errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Links => "link",
            Self::Images => "image",
            Self::Tables => "table",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction strategy selected for a document.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    /// Primary page-stream backend.
    Pages(&'a PageStream),
    /// Alternate (raw text) page-stream backend.
    LegacyPages(&'a PageCollection),
    Flow(&'a FlowDocument),
    Slides(&'a SlideDeck),
}

/// Select the extraction strategy for `document`, failing on foreign documents.
pub fn route(document: &Document, kind: DataKind) -> Result<Route<'_>> {
    let route = match document {
        Document::Pages(doc) => Route::Pages(doc),
        Document::LegacyPages(doc) => Route::LegacyPages(doc),
        Document::Flow(doc) => Route::Flow(doc),
        Document::Slides(doc) => Route::Slides(doc),
        Document::Foreign(doc) => {
            return Err(Error::UnsupportedDocument {
                operation: kind.operation(),
                kind: doc.kind.clone(),
            })
        }
    };
    log::debug!("{} extraction routed to {}", kind, document.kind());
    Ok(route)
}
