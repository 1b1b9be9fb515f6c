//! Text extraction.

use std::collections::HashSet;

use log::debug;

use crate::backend::LayoutBackend;
use crate::dispatch::{route, DataKind, Route};
use crate::document::Document;
use crate::error::Result;
use crate::extraction::Extraction;
use crate::model::{
    Block, FlowDocument, PageCollection, PageStream, Paragraph, RawPageText, Run, Shape,
    SlideDeck, Span,
};
use crate::records::{ParagraphRecord, RunRecord, ShapeRecord, SpanRecord, TextRecord};
use crate::reflow::merge_lines;
use crate::style::infer_font_style;

use super::{collapse_whitespace, open_session, PageTextSource};

/// Extract text records from an opened document.
pub fn extract_text(
    document: &Document,
    layout: Option<&dyn LayoutBackend>,
) -> Result<Extraction<TextRecord>> {
    Ok(match route(document, DataKind::Text)? {
        Route::Pages(doc) => page_stream_text(doc),
        Route::LegacyPages(doc) => page_collection_text(doc, layout),
        Route::Flow(doc) => flow_text(doc),
        Route::Slides(deck) => slide_text(deck),
    })
}

fn page_stream_text(doc: &PageStream) -> Extraction<TextRecord> {
    let mut out = Extraction::new();
    out.push(TextRecord::DocumentMetadata {
        document_metadata: doc.metadata.clone(),
    });

    for (index, page) in doc.pages.iter().enumerate() {
        for block in &page.blocks {
            let Block::Text(lines) = block else {
                continue;
            };
            for line in lines {
                let joined = line
                    .spans
                    .iter()
                    .map(|span| span.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ");
                let line_text = collapse_whitespace(&joined);
                if line_text.is_empty() {
                    continue;
                }
                out.push(TextRecord::PageLine {
                    page: index + 1,
                    rotation: page.rotation,
                    dimensions: page.rect.to_array(),
                    line_text,
                    spans: line.spans.iter().map(span_record).collect(),
                });
            }
        }
    }
    out
}

fn span_record(span: &Span) -> SpanRecord {
    let (bold, italic) = infer_font_style(&span.font);
    SpanRecord {
        text: span.text.clone(),
        font: span.font.clone(),
        size: span.size,
        bbox: span.bbox.to_array(),
        flags: span.flags,
        origin: [span.origin.x, span.origin.y],
        color: span.color,
        bold,
        italic,
        additional: span.extra.clone(),
    }
}

fn page_collection_text(
    doc: &PageCollection,
    layout: Option<&dyn LayoutBackend>,
) -> Extraction<TextRecord> {
    let mut out = Extraction::new();
    let mut source = PageTextSource::new(open_session(layout, &doc.source));

    for (index, raw) in doc.pages.iter().enumerate() {
        let text = match source.layout_text(index) {
            Some(text) => collapse_whitespace(&text),
            None => match raw {
                RawPageText::Text(raw) => merge_lines(raw),
                RawPageText::Unavailable => String::new(),
                RawPageText::Failed(reason) => {
                    debug!("page {} raw text failed: {}", index + 1, reason);
                    format!("Error extracting text: {}", reason)
                }
            },
        };
        out.push(TextRecord::PageText {
            page: index + 1,
            text,
        });
    }
    out
}

/// Record for one run; unset font, size and color stay unset.
pub(crate) fn run_record(run: &Run) -> RunRecord {
    let format = &run.format;
    RunRecord {
        text: run.text.clone(),
        font: format.font.clone(),
        size: format.size_pt,
        bold: format.bold.unwrap_or(false),
        italic: format.italic.unwrap_or(false),
        underline: format.underline.unwrap_or(false),
        color: format.color.clone(),
        highlight: format.highlight.clone(),
    }
}

fn flow_text(doc: &FlowDocument) -> Extraction<TextRecord> {
    let mut out = Extraction::new();
    for para in &doc.paragraphs {
        out.push(TextRecord::Paragraph(ParagraphRecord {
            text: para.text.trim().to_string(),
            style: para.style.clone(),
            alignment: para.alignment,
            runs: para.runs.iter().map(run_record).collect(),
        }));
    }
    out
}

fn slide_text(deck: &SlideDeck) -> Extraction<TextRecord> {
    let mut out = Extraction::new();
    for (index, slide) in deck.slides.iter().enumerate() {
        let shapes: Vec<ShapeRecord> = slide.shapes.iter().filter_map(shape_record).collect();
        if shapes.is_empty() {
            continue;
        }
        out.push(TextRecord::Slide {
            slide: index + 1,
            shapes,
        });
    }
    out
}

/// Text record of one top-level shape, `None` when it carries no text.
fn shape_record(shape: &Shape) -> Option<ShapeRecord> {
    let (paragraphs, text) = match &shape.text_frame {
        Some(frame) => {
            let paragraphs = unique_paragraphs(&frame.paragraphs);
            let text = paragraphs
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            (Some(paragraphs), text)
        }
        None => (
            None,
            shape.text.as_deref().map(str::trim).unwrap_or("").to_string(),
        ),
    };
    if text.is_empty() {
        return None;
    }

    let geometry = shape.geometry;
    Some(ShapeRecord {
        shape_id: shape.id,
        left: geometry.map(|g| g.left),
        top: geometry.map(|g| g.top),
        width: geometry.map(|g| g.width),
        height: geometry.map(|g| g.height),
        paragraphs,
        text,
    })
}

/// Non-empty paragraphs, keeping the first occurrence of each text.
fn unique_paragraphs(paragraphs: &[Paragraph]) -> Vec<ParagraphRecord> {
    let mut seen = HashSet::new();
    paragraphs
        .iter()
        .filter_map(|para| {
            let text = para.text.trim();
            if text.is_empty() || !seen.insert(text.to_string()) {
                return None;
            }
            Some(ParagraphRecord {
                text: text.to_string(),
                style: None,
                alignment: para.alignment,
                runs: para.runs.iter().map(run_record).collect(),
            })
        })
        .collect()
}
