//! The opened document handed from a loader to the extraction engine.

use serde::{Deserialize, Serialize};

use crate::model::{FlowDocument, PageCollection, PageStream, SlideDeck};

/// Family of a document container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentVariant {
    /// Fixed-layout pages (PDF).
    PageStream,
    /// Paragraphs and runs (DOCX).
    Flow,
    /// Slides holding shape trees (PPTX, PPT).
    SlideDeck,
}

impl DocumentVariant {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageStream => "page-stream",
            Self::Flow => "flow",
            Self::SlideDeck => "slide-deck",
        }
    }
}

/// A document of a kind the engine does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignDocument {
    /// Kind label reported by the loader (e.g. `spreadsheet`).
    pub kind: String,
}

impl ForeignDocument {
    /// Create a foreign document with the given kind label.
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// An opened document, tagged once by the loader that produced it.
#[derive(Debug, Clone)]
pub enum Document {
    /// Page stream opened by the primary (layout) backend.
    Pages(PageStream),
    /// Page stream opened by the alternate (raw text) backend.
    LegacyPages(PageCollection),
    Flow(FlowDocument),
    Slides(SlideDeck),
    Foreign(ForeignDocument),
}

impl Document {
    /// Family of this document, `None` for foreign documents.
    pub fn variant(&self) -> Option<DocumentVariant> {
        match self {
            Self::Pages(_) | Self::LegacyPages(_) => Some(DocumentVariant::PageStream),
            Self::Flow(_) => Some(DocumentVariant::Flow),
            Self::Slides(_) => Some(DocumentVariant::SlideDeck),
            Self::Foreign(_) => None,
        }
    }

    /// Kind label used in error messages.
    pub fn kind(&self) -> &str {
        match self {
            Self::Pages(_) => "page-stream",
            Self::LegacyPages(_) => "page-stream (raw text)",
            Self::Flow(_) => "flow",
            Self::Slides(_) => "slide-deck",
            Self::Foreign(doc) => &doc.kind,
        }
    }
}

impl From<PageStream> for Document {
    fn from(doc: PageStream) -> Self {
        Self::Pages(doc)
    }
}

impl From<PageCollection> for Document {
    fn from(doc: PageCollection) -> Self {
        Self::LegacyPages(doc)
    }
}

impl From<FlowDocument> for Document {
    fn from(doc: FlowDocument) -> Self {
        Self::Flow(doc)
    }
}

impl From<SlideDeck> for Document {
    fn from(doc: SlideDeck) -> Self {
        Self::Slides(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_tags() {
        assert_eq!(
            Document::from(PageStream::new()).variant(),
            Some(DocumentVariant::PageStream)
        );
        assert_eq!(
            Document::from(PageCollection::default()).variant(),
            Some(DocumentVariant::PageStream)
        );
        assert_eq!(
            Document::from(FlowDocument::new()).variant(),
            Some(DocumentVariant::Flow)
        );
        assert_eq!(
            Document::from(SlideDeck::default()).variant(),
            Some(DocumentVariant::SlideDeck)
        );

        let foreign = Document::Foreign(ForeignDocument::new("spreadsheet"));
        assert_eq!(foreign.variant(), None);
        assert_eq!(foreign.kind(), "spreadsheet");
    }
}
