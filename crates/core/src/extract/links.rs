//! Link extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::backend::LayoutBackend;
use crate::dispatch::{route, DataKind, Route};
use crate::document::Document;
use crate::error::Result;
use crate::extraction::Extraction;
use crate::model::{FlowDocument, PageCollection, PageStream, RawPageText, SlideDeck};
use crate::records::LinkRecord;
use crate::reflow::merge_lines;

use super::{open_session, PageTextSource};

/// URLs inside running text.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Extract link records from an opened document.
pub fn extract_links(
    document: &Document,
    layout: Option<&dyn LayoutBackend>,
) -> Result<Extraction<LinkRecord>> {
    Ok(match route(document, DataKind::Links)? {
        Route::Pages(doc) => page_stream_links(doc),
        Route::LegacyPages(doc) => page_collection_links(doc, layout),
        Route::Flow(doc) => flow_links(doc),
        Route::Slides(deck) => slide_links(deck),
    })
}

fn page_stream_links(doc: &PageStream) -> Extraction<LinkRecord> {
    let mut out = Extraction::new();
    let mut seen = HashSet::new();

    for (index, page) in doc.pages.iter().enumerate() {
        for link in &page.links {
            let Some(uri) = link.uri.as_deref().filter(|uri| !uri.is_empty()) else {
                continue;
            };
            if !seen.insert((index, uri.to_string())) {
                continue;
            }
            out.push(LinkRecord::Annotation {
                page: index + 1,
                uri: uri.to_string(),
                rect: link.rect.to_array(),
                kind: link.kind,
            });
        }
    }
    out
}

fn page_collection_links(
    doc: &PageCollection,
    layout: Option<&dyn LayoutBackend>,
) -> Extraction<LinkRecord> {
    let mut out = Extraction::new();
    let mut source = PageTextSource::new(open_session(layout, &doc.source));

    for (index, raw) in doc.pages.iter().enumerate() {
        let text = match source.layout_text(index) {
            Some(text) => text,
            None => match raw {
                RawPageText::Text(raw) => merge_lines(raw),
                RawPageText::Unavailable => String::new(),
                RawPageText::Failed(reason) => {
                    debug!("skipping links of page {}: {}", index + 1, reason);
                    out.skip();
                    continue;
                }
            },
        };
        for url in URL_REGEX.find_iter(&text) {
            out.push(LinkRecord::PageText {
                page: index + 1,
                uri: url.as_str().to_string(),
                contents: String::new(),
            });
        }
    }
    out
}

fn flow_links(doc: &FlowDocument) -> Extraction<LinkRecord> {
    let mut out = Extraction::new();
    for para in doc.paragraphs.iter().filter(|p| p.text.contains("http")) {
        let text = para.text.trim().to_string();
        out.push(LinkRecord::Paragraph {
            url: text.clone(),
            text,
        });
    }
    out
}

fn slide_links(deck: &SlideDeck) -> Extraction<LinkRecord> {
    let mut out = Extraction::new();
    for (index, slide) in deck.slides.iter().enumerate() {
        let mut seen = HashSet::new();
        for shape in &slide.shapes {
            let Some(target) = shape.click_action.as_ref().and_then(|a| a.hyperlink.as_ref())
            else {
                continue;
            };
            let url = match target {
                Ok(url) => url.trim().to_string(),
                Err(broken) => {
                    debug!("skipping hyperlink on slide {}: {}", index + 1, broken);
                    out.skip();
                    continue;
                }
            };
            if url.is_empty() {
                continue;
            }
            let text = shape
                .text_content()
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            if !seen.insert((url.clone(), text.clone())) {
                continue;
            }
            out.push(LinkRecord::Slide {
                slide: index + 1,
                text,
                url,
            });
        }
    }
    out
}
