//! Flow (paragraph and run) document model.

use serde::Serialize;

use super::parts::Relationships;

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

impl Alignment {
    /// Map a WordprocessingML `w:jc` or DrawingML `algn` value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" | "l" => Some(Self::Left),
            "center" | "ctr" => Some(Self::Center),
            "right" | "end" | "r" => Some(Self::Right),
            "both" | "just" | "justify" | "lowKashida" | "mediumKashida" | "highKashida" => {
                Some(Self::Justify)
            }
            "distribute" | "dist" | "thaiDist" | "justLow" => Some(Self::Distribute),
            _ => None,
        }
    }
}

/// Character formatting of a run. `None` means the source left it unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunFormat {
    pub font: Option<String>,
    pub size_pt: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// Hex RGB color, e.g. `FF0000`.
    pub color: Option<String>,
    pub highlight: Option<String>,
}

/// A contiguous span of text sharing one formatting set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    /// Create an unformatted run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: RunFormat::default(),
        }
    }

    /// Set the run formatting.
    pub fn with_format(mut self, format: RunFormat) -> Self {
        self.format = format;
        self
    }
}

/// A paragraph of runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    /// Full paragraph text (may include text outside `runs`, such as fields).
    pub text: String,
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a paragraph whose text is the concatenation of its runs.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            text: runs.iter().map(|r| r.text.as_str()).collect(),
            runs,
            ..Default::default()
        }
    }

    /// Create a paragraph holding one unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![Run::new(text)])
    }

    /// Set the style name.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A table as a row-major grid of cell texts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableGrid {
    pub style: Option<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Create an unstyled grid from string rows.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            style: None,
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Set the style name.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A picture placed inline with text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineShape {
    /// `docPr` name attribute.
    pub name: Option<String>,
    /// Embed relationship id of the picture blip.
    pub embed: Option<String>,
    /// Declared extent in EMU.
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A drawing element found in the body markup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    /// Embed relationship id of the first blip inside the drawing.
    pub embed: Option<String>,
    /// True for floating (anchored) drawings, false for inline ones.
    pub anchored: bool,
}

/// A flow document.
#[derive(Debug, Clone, Default)]
pub struct FlowDocument {
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<TableGrid>,
    pub inline_shapes: Vec<InlineShape>,
    /// Every drawing element of the body, in document order.
    pub drawings: Vec<Drawing>,
    pub rels: Relationships,
}

impl FlowDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_mapping() {
        assert_eq!(Alignment::from_ooxml("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_ooxml("ctr"), Some(Alignment::Center));
        assert_eq!(Alignment::from_ooxml("r"), Some(Alignment::Right));
        assert_eq!(Alignment::from_ooxml("bogus"), None);
    }

    #[test]
    fn test_paragraph_from_runs() {
        let para = Paragraph::from_runs(vec![Run::new("Hello "), Run::new("world")]);
        assert_eq!(para.text, "Hello world");
        assert_eq!(para.runs.len(), 2);
    }
}
