//! Normalized output records.
//!
//! Records serialize to flat JSON objects whose keys depend on the source
//! variant; the enums are untagged so the JSON carries no variant marker.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Alignment;

/// Font name reported for runs that leave the font unset.
pub const DEFAULT_FONT_NAME: &str = "DefaultFont";

/// Font size in points reported for runs that leave the size unset.
pub const DEFAULT_FONT_SIZE_PT: f32 = 11.0;

/// Hex RGB color reported for runs that leave the color unset.
pub const DEFAULT_COLOR: &str = "000000";

/// Per-span metadata of a page-stream line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanRecord {
    pub text: String,
    pub font: String,
    pub size: f32,
    pub bbox: [f32; 4],
    pub flags: u32,
    pub origin: [f32; 2],
    pub color: u32,
    pub bold: bool,
    pub italic: bool,
    /// Backend keys not covered above.
    pub additional: BTreeMap<String, serde_json::Value>,
}

/// Formatting of one run. Unset font, size and color stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub text: String,
    pub font: Option<String>,
    pub size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl RunRecord {
    /// Font name, or [`DEFAULT_FONT_NAME`] when unset.
    pub fn font_name(&self) -> &str {
        self.font.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }

    /// Font size in points, or [`DEFAULT_FONT_SIZE_PT`] when unset.
    pub fn font_size(&self) -> f32 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE_PT)
    }

    /// Hex RGB color, or [`DEFAULT_COLOR`] when unset.
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// One paragraph of a flow document or a slide text frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphRecord {
    pub text: String,
    /// Style name. Always present for flow paragraphs, absent for slide paragraphs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub runs: Vec<RunRecord>,
}

/// A text-bearing shape of a slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecord {
    pub shape_id: Option<u32>,
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// De-duplicated paragraphs; absent when the shape has no text frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<ParagraphRecord>>,
    pub text: String,
}

/// A text extraction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextRecord {
    /// Leading whole-document metadata of a page stream.
    DocumentMetadata {
        document_metadata: BTreeMap<String, String>,
    },
    /// One non-empty line of a page stream.
    PageLine {
        page: usize,
        rotation: i32,
        dimensions: [f32; 4],
        line_text: String,
        spans: Vec<SpanRecord>,
    },
    /// Whole-page text from the raw text backend.
    PageText { page: usize, text: String },
    Paragraph(ParagraphRecord),
    Slide { slide: usize, shapes: Vec<ShapeRecord> },
}

impl TextRecord {
    /// 1-based page or slide number, if the record has one.
    pub fn location(&self) -> Option<usize> {
        match self {
            Self::PageLine { page, .. } | Self::PageText { page, .. } => Some(*page),
            Self::Slide { slide, .. } => Some(*slide),
            Self::DocumentMetadata { .. } | Self::Paragraph(_) => None,
        }
    }
}

/// A link extraction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LinkRecord {
    /// A link annotation of a page stream.
    Annotation {
        page: usize,
        uri: String,
        rect: [f32; 4],
        kind: crate::model::LinkKind,
    },
    /// A URL found in raw page text.
    PageText {
        page: usize,
        uri: String,
        contents: String,
    },
    /// A flow paragraph mentioning a URL.
    Paragraph { text: String, url: String },
    /// A shape click-action hyperlink.
    Slide { slide: usize, text: String, url: String },
}

impl LinkRecord {
    /// 1-based page or slide number, if the record has one.
    pub fn location(&self) -> Option<usize> {
        match self {
            Self::Annotation { page, .. } | Self::PageText { page, .. } => Some(*page),
            Self::Slide { slide, .. } => Some(*slide),
            Self::Paragraph { .. } => None,
        }
    }

    /// Link target.
    pub fn url(&self) -> &str {
        match self {
            Self::Annotation { uri, .. } | Self::PageText { uri, .. } => uri,
            Self::Paragraph { url, .. } | Self::Slide { url, .. } => url,
        }
    }

    /// Display text or context, empty when there is none.
    pub fn text(&self) -> &str {
        match self {
            Self::Annotation { .. } => "",
            Self::PageText { contents, .. } => contents,
            Self::Paragraph { text, .. } | Self::Slide { text, .. } => text,
        }
    }
}

/// An image extraction record. `blob` is the base64 of the original bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImageRecord {
    /// Raster image referenced by a page.
    Page {
        page: usize,
        xref: u32,
        format: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        blob: String,
    },
    /// Inline picture of a flow document.
    Inline {
        index: usize,
        filename: String,
        blob: String,
        width: Option<i64>,
        height: Option<i64>,
    },
    /// Drawing element of a flow document.
    Floating {
        floating_index: usize,
        #[serde(rename = "rId")]
        r_id: String,
        blob: String,
    },
    /// Picture found in a slide shape tree.
    Shape {
        slide: usize,
        image_id: Option<u32>,
        blob: String,
        format: String,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Image relationship of a slide part.
    Relationship {
        slide: usize,
        #[serde(rename = "rId")]
        r_id: String,
        format: String,
        blob: String,
    },
}

impl ImageRecord {
    /// 1-based page or slide number, if the record has one.
    pub fn location(&self) -> Option<usize> {
        match self {
            Self::Page { page, .. } => Some(*page),
            Self::Shape { slide, .. } | Self::Relationship { slide, .. } => Some(*slide),
            Self::Inline { .. } | Self::Floating { .. } => None,
        }
    }

    /// Identifying name: file name, shape id, relationship id or xref.
    pub fn name(&self) -> Option<String> {
        match self {
            Self::Page { xref, .. } => Some(xref.to_string()),
            Self::Inline { filename, .. } => Some(filename.clone()),
            Self::Floating { r_id, .. } | Self::Relationship { r_id, .. } => Some(r_id.clone()),
            Self::Shape { image_id, .. } => image_id.map(|id| id.to_string()),
        }
    }

    /// Declared format, if the record carries one.
    pub fn format(&self) -> Option<&str> {
        match self {
            Self::Page { format, .. } => format.as_deref(),
            Self::Shape { format, .. } | Self::Relationship { format, .. } => Some(format),
            Self::Inline { .. } | Self::Floating { .. } => None,
        }
    }

    /// Width and height, as reported by the source.
    pub fn dimensions(&self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Page { width, height, .. } | Self::Shape { width, height, .. } => {
                (width.map(i64::from), height.map(i64::from))
            }
            Self::Inline { width, height, .. } => (*width, *height),
            Self::Floating { .. } | Self::Relationship { .. } => (None, None),
        }
    }

    /// Base64 payload.
    pub fn blob(&self) -> &str {
        match self {
            Self::Page { blob, .. }
            | Self::Inline { blob, .. }
            | Self::Floating { blob, .. }
            | Self::Shape { blob, .. }
            | Self::Relationship { blob, .. } => blob,
        }
    }
}

/// A table found in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRecord {
    /// 1-based table number within the document.
    pub table_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<usize>,
    pub style: String,
    pub data: Vec<Vec<String>>,
    pub rows: usize,
    pub columns: usize,
}

impl TableRecord {
    /// Build a record from a grid; `rows` and `columns` follow the grid.
    pub fn new(table_index: usize, style: impl Into<String>, data: Vec<Vec<String>>) -> Self {
        let rows = data.len();
        let columns = data.first().map(Vec::len).unwrap_or(0);
        Self {
            table_index,
            page: None,
            slide: None,
            style: style.into(),
            data,
            rows,
            columns,
        }
    }

    /// Set the owning page.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the owning slide.
    pub fn on_slide(mut self, slide: usize) -> Self {
        self.slide = Some(slide);
        self
    }
}

/// A table extraction entry: a table, or a warning in place of tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableEntry {
    Table(TableRecord),
    Warning { warning: String },
}

impl TableEntry {
    /// Build a warning entry.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            warning: message.into(),
        }
    }

    /// The table, if this entry is one.
    pub fn as_table(&self) -> Option<&TableRecord> {
        match self {
            Self::Table(table) => Some(table),
            Self::Warning { .. } => None,
        }
    }

    /// The warning text, if this entry is one.
    pub fn as_warning(&self) -> Option<&str> {
        match self {
            Self::Warning { warning } => Some(warning),
            Self::Table(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_defaults() {
        let run = RunRecord {
            text: "x".into(),
            font: None,
            size: None,
            bold: false,
            italic: false,
            underline: false,
            color: None,
            highlight: None,
        };
        assert_eq!(run.font_name(), "DefaultFont");
        assert_eq!(run.font_size(), 11.0);
        assert_eq!(run.color(), "000000");
    }

    #[test]
    fn test_table_columns_follow_first_row() {
        let table = TableRecord::new(1, "S", vec![vec!["a".into(), "b".into()], vec!["c".into()]]);
        assert_eq!(table.rows, 2);
        assert_eq!(table.columns, 2);
        assert_eq!(table.data[1].len(), 1);

        let empty = TableRecord::new(2, "S", vec![]);
        assert_eq!(empty.columns, 0);
    }

    #[test]
    fn test_untagged_serialization() {
        let link = LinkRecord::Slide {
            slide: 1,
            text: "Site".into(),
            url: "https://example.com".into(),
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"slide": 1, "text": "Site", "url": "https://example.com"})
        );

        let image = ImageRecord::Floating {
            floating_index: 1,
            r_id: "rId4".into(),
            blob: "AA==".into(),
        };
        assert_eq!(
            serde_json::to_value(&image).unwrap(),
            json!({"floating_index": 1, "rId": "rId4", "blob": "AA=="})
        );

        let warning = TableEntry::warning("No tables found with pdf-extract.");
        assert_eq!(
            serde_json::to_value(&warning).unwrap(),
            json!({"warning": "No tables found with pdf-extract."})
        );
    }
}
