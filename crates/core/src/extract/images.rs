//! Image extraction.

use log::debug;

use crate::dispatch::{route, DataKind, Route};
use crate::document::Document;
use crate::error::Result;
use crate::extraction::{encode_blob, Extraction};
use crate::model::{FlowDocument, PageStream, Relationships, SlideDeck};
use crate::records::ImageRecord;
use crate::shapes::shape_images;

/// Extract image records from an opened document.
pub fn extract_images(document: &Document) -> Result<Extraction<ImageRecord>> {
    Ok(match route(document, DataKind::Images)? {
        Route::Pages(doc) => page_stream_images(doc),
        Route::LegacyPages(_) => {
            debug!("raw text backend exposes no images");
            Extraction::new()
        }
        Route::Flow(doc) => flow_images(doc),
        Route::Slides(deck) => slide_images(deck),
    })
}

fn page_stream_images(doc: &PageStream) -> Extraction<ImageRecord> {
    let mut out = Extraction::new();
    for (index, page) in doc.pages.iter().enumerate() {
        for &xref in &page.images {
            let record = match doc.extract_image(xref) {
                Some(Ok(image)) => ImageRecord::Page {
                    page: index + 1,
                    xref,
                    format: image.ext.clone(),
                    width: image.width,
                    height: image.height,
                    blob: encode_blob(&image.bytes),
                },
                unresolved => {
                    if let Some(Err(broken)) = unresolved {
                        debug!("image object {} on page {}: {}", xref, index + 1, broken);
                    }
                    ImageRecord::Page {
                        page: index + 1,
                        xref,
                        format: None,
                        width: None,
                        height: None,
                        blob: String::new(),
                    }
                }
            };
            out.push(record);
        }
    }
    out
}

fn flow_images(doc: &FlowDocument) -> Extraction<ImageRecord> {
    let mut out = Extraction::new();

    for (i, shape) in doc.inline_shapes.iter().enumerate() {
        let Some(part) = shape.embed.as_deref().and_then(|id| doc.rels.related_part(id)) else {
            debug!("skipping inline shape {}: no image part", i + 1);
            out.skip();
            continue;
        };
        out.push(ImageRecord::Inline {
            index: i + 1,
            filename: shape
                .name
                .clone()
                .unwrap_or_else(|| format!("Image{}", i + 1)),
            blob: encode_blob(&part.blob),
            width: shape.width,
            height: shape.height,
        });
    }

    for (i, drawing) in doc.drawings.iter().enumerate() {
        let resolved = drawing
            .embed
            .as_deref()
            .and_then(|id| doc.rels.related_part(id).map(|part| (id, part)));
        let Some((r_id, part)) = resolved else {
            debug!("skipping drawing {}: no image part", i + 1);
            out.skip();
            continue;
        };
        out.push(ImageRecord::Floating {
            floating_index: i + 1,
            r_id: r_id.to_string(),
            blob: encode_blob(&part.blob),
        });
    }
    out
}

fn slide_images(deck: &SlideDeck) -> Extraction<ImageRecord> {
    let mut out = Extraction::new();
    for (index, slide) in deck.slides.iter().enumerate() {
        for shape in &slide.shapes {
            let found = shape_images(shape, &slide.rels, index + 1, &mut out.skipped);
            out.records.extend(found);
        }
    }

    if out.is_empty() {
        debug!("no images in shape trees, scanning slide relationships");
        for (index, slide) in deck.slides.iter().enumerate() {
            relationship_images(&slide.rels, index + 1, &mut out);
        }
    }
    out
}

fn relationship_images(rels: &Relationships, slide: usize, out: &mut Extraction<ImageRecord>) {
    for rel in rels.iter().filter(|rel| rel.is_image()) {
        match rel.target_part() {
            Ok(part) => out.push(ImageRecord::Relationship {
                slide,
                r_id: rel.id.clone(),
                format: part.ext().unwrap_or_else(|| "unknown".to_string()),
                blob: encode_blob(&part.blob),
            }),
            Err(broken) => {
                debug!("skipping relationship on slide {}: {}", slide, broken);
                out.skip();
            }
        }
    }
}
