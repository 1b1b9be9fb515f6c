//! Build a [`PageStream`] from a lopdf document.

use std::collections::BTreeMap;

use docex_core::model::{
    Broken, EmbeddedImage, Fallible, LinkAnnotation, LinkKind, Page, PageStream, Rect,
};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::content::page_lines;
use crate::objects::{as_dict, get_resolved, inherited, name, number, text_string};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Info dictionary keys reported in the metadata map, with their output names.
const INFO_KEYS: &[(&[u8], &str)] = &[
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Keywords", "keywords"),
    (b"Creator", "creator"),
    (b"Producer", "producer"),
    (b"CreationDate", "creationDate"),
    (b"ModDate", "modDate"),
    (b"Trapped", "trapped"),
];

/// Read metadata, pages and image objects of a loaded PDF.
pub fn read_page_stream(doc: &Document) -> PageStream {
    let mut stream = PageStream::new();
    stream.metadata = read_metadata(doc);

    for (number, page_id) in doc.get_pages() {
        let page = read_page(doc, page_id, &mut stream.images);
        log::debug!(
            "page {}: {} blocks, {} links, {} images",
            number,
            page.blocks.len(),
            page.links.len(),
            page.images.len()
        );
        stream.pages.push(page);
    }
    stream
}

/// Document metadata; absent keys map to empty strings.
pub fn read_metadata(doc: &Document) -> BTreeMap<String, String> {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| as_dict(doc, obj));

    let mut metadata = BTreeMap::new();
    metadata.insert("format".to_string(), format!("PDF {}", doc.version));
    for (key, out) in INFO_KEYS {
        let value = info
            .and_then(|dict| get_resolved(doc, dict, key))
            .and_then(|obj| text_string(obj).or_else(|| name(obj)))
            .unwrap_or_default();
        metadata.insert(out.to_string(), value);
    }
    metadata
}

fn read_page(
    doc: &Document,
    page_id: ObjectId,
    images: &mut BTreeMap<u32, Fallible<EmbeddedImage>>,
) -> Page {
    let rotation = inherited(doc, page_id, b"Rotate")
        .and_then(number)
        .map(|r| (r as i32).rem_euclid(360))
        .unwrap_or(0);
    let media_box = media_box(doc, page_id);
    let (width, height) = (media_box.width().abs(), media_box.height().abs());
    let rect = if rotation == 90 || rotation == 270 {
        Rect::new(0.0, 0.0, height, width)
    } else {
        Rect::new(0.0, 0.0, width, height)
    };

    let mut page = Page::new(rect);
    page.rotation = rotation;

    match page_lines(doc, page_id, media_box.y1) {
        Ok(lines) if !lines.is_empty() => page.add_text_lines(lines),
        Ok(_) => {}
        Err(e) => log::debug!("no text on page object {:?}: {}", page_id, e),
    }
    page.links = page_links(doc, page_id, media_box.y1);
    page.images = page_images(doc, page_id, images);
    page
}

/// MediaBox in PDF user space (bottom-left origin).
pub(crate) fn media_box(doc: &Document, page_id: ObjectId) -> Rect {
    let values: Vec<f32> = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| arr.iter().filter_map(|o| resolve_number(doc, o)).collect())
        .unwrap_or_default();
    let [x0, y0, x1, y1] = match values.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => DEFAULT_MEDIA_BOX,
    };
    Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

fn resolve_number(doc: &Document, obj: &Object) -> Option<f32> {
    crate::objects::resolve(doc, obj).and_then(number)
}

/// Flip a user-space rectangle to top-left page coordinates.
fn flip_rect(values: &[f32], top: f32) -> Option<Rect> {
    let [x0, y0, x1, y1] = values else {
        return None;
    };
    Some(Rect::new(
        x0.min(*x1),
        top - y0.max(*y1),
        x0.max(*x1),
        top - y0.min(*y1),
    ))
}

fn page_links(doc: &Document, page_id: ObjectId, top: f32) -> Vec<LinkAnnotation> {
    let Some(annots) = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| get_resolved(doc, page, b"Annots"))
        .and_then(|obj| obj.as_array().ok())
    else {
        return Vec::new();
    };

    annots
        .iter()
        .filter_map(|obj| as_dict(doc, obj))
        .filter(|annot| {
            get_resolved(doc, annot, b"Subtype").and_then(name).as_deref() == Some("Link")
        })
        .filter_map(|annot| {
            let values: Vec<f32> = get_resolved(doc, annot, b"Rect")?
                .as_array()
                .ok()?
                .iter()
                .filter_map(|o| resolve_number(doc, o))
                .collect();
            let rect = flip_rect(&values, top)?;
            let (kind, uri) = link_action(doc, annot);
            Some(LinkAnnotation { uri, rect, kind })
        })
        .collect()
}

/// Kind and URI of a link annotation's action.
fn link_action(doc: &Document, annot: &Dictionary) -> (LinkKind, Option<String>) {
    if let Some(action) = annot.get(b"A").ok().and_then(|obj| as_dict(doc, obj)) {
        let kind = get_resolved(doc, action, b"S").and_then(name);
        return match kind.as_deref() {
            Some("URI") => (
                LinkKind::Uri,
                get_resolved(doc, action, b"URI").and_then(text_string),
            ),
            Some("GoTo") => (LinkKind::Goto, None),
            Some("GoToR") => (
                LinkKind::Gotor,
                get_resolved(doc, action, b"F").and_then(text_string),
            ),
            Some("Launch") => (
                LinkKind::Launch,
                get_resolved(doc, action, b"F").and_then(text_string),
            ),
            Some("Named") => (LinkKind::Named, None),
            _ => (LinkKind::None, None),
        };
    }
    if annot.has(b"Dest") {
        return (LinkKind::Goto, None);
    }
    (LinkKind::None, None)
}

/// Cross-reference ids of the image XObjects of a page; new ids are
/// resolved into `images`.
fn page_images(
    doc: &Document,
    page_id: ObjectId,
    images: &mut BTreeMap<u32, Fallible<EmbeddedImage>>,
) -> Vec<u32> {
    let Some(xobjects) = inherited(doc, page_id, b"Resources")
        .and_then(|res| as_dict(doc, res))
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|obj| as_dict(doc, obj))
    else {
        return Vec::new();
    };

    let mut ids = Vec::new();
    for (_, obj) in xobjects.iter() {
        let Object::Reference(id) = obj else {
            continue;
        };
        let xref = id.0;
        let image = match doc.get_object(*id) {
            Ok(Object::Stream(stream)) => {
                let subtype = get_resolved(doc, &stream.dict, b"Subtype").and_then(name);
                if subtype.as_deref() != Some("Image") {
                    continue;
                }
                Ok(embedded_image(doc, &stream.dict, stream.content.clone()))
            }
            Ok(_) => continue,
            Err(e) => Err(Broken::new(format!("object {} {}: {}", id.0, id.1, e))),
        };
        images.entry(xref).or_insert(image);
        ids.push(xref);
    }
    ids
}

fn embedded_image(doc: &Document, dict: &Dictionary, bytes: Vec<u8>) -> EmbeddedImage {
    let dimension = |key: &[u8]| {
        get_resolved(doc, dict, key)
            .and_then(number)
            .map(|v| v as u32)
    };
    let filter = match get_resolved(doc, dict, b"Filter") {
        Some(Object::Array(filters)) => filters.last().and_then(name),
        Some(other) => name(other),
        None => None,
    };

    EmbeddedImage {
        bytes,
        width: dimension(b"Width"),
        height: dimension(b"Height"),
        ext: Some(image_ext(filter.as_deref()).to_string()),
    }
}

/// Image format label for the last stream filter.
fn image_ext(filter: Option<&str>) -> &'static str {
    match filter {
        Some("DCTDecode") => "jpeg",
        Some("JPXDecode") => "jpx",
        Some("JBIG2Decode") => "jb2",
        Some("CCITTFaxDecode") => "fax",
        _ => "raw",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{simple_pdf, with_info, with_link, with_image, TextOp};

    #[test]
    fn test_image_ext() {
        assert_eq!(image_ext(Some("DCTDecode")), "jpeg");
        assert_eq!(image_ext(Some("FlateDecode")), "raw");
        assert_eq!(image_ext(None), "raw");
    }

    #[test]
    fn test_flip_rect() {
        let rect = flip_rect(&[100.0, 700.0, 200.0, 720.0], 792.0).unwrap();
        assert_eq!(rect, Rect::new(100.0, 72.0, 200.0, 92.0));
        assert!(flip_rect(&[1.0, 2.0], 792.0).is_none());
    }

    #[test]
    fn test_metadata_defaults_to_empty() {
        let doc = simple_pdf(&[]);
        let metadata = read_metadata(&doc);
        assert_eq!(metadata["format"], "PDF 1.5");
        assert_eq!(metadata["title"], "");
        assert_eq!(metadata["trapped"], "");
        assert_eq!(metadata.len(), 10);
    }

    #[test]
    fn test_metadata_from_info() {
        let mut doc = simple_pdf(&[]);
        with_info(&mut doc, "Quarterly Report", "Ada");
        let metadata = read_metadata(&doc);
        assert_eq!(metadata["title"], "Quarterly Report");
        assert_eq!(metadata["author"], "Ada");
    }

    #[test]
    fn test_read_page_stream() {
        let mut doc = simple_pdf(&[TextOp::Show(72.0, 700.0, "Hello PDF")]);
        with_link(&mut doc, "https://example.com");
        with_image(&mut doc, &[0xFF, 0xD8, 0xFF]);

        let stream = read_page_stream(&doc);
        assert_eq!(stream.page_count(), 1);

        let page = &stream.pages[0];
        assert_eq!(page.rotation, 0);
        assert_eq!(page.rect, Rect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(page.blocks.len(), 1);

        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].kind, LinkKind::Uri);
        assert_eq!(page.links[0].uri.as_deref(), Some("https://example.com"));
        assert_eq!(page.links[0].rect, Rect::new(72.0, 72.0, 200.0, 92.0));

        assert_eq!(page.images.len(), 1);
        let image = stream.extract_image(page.images[0]).unwrap().as_ref().unwrap();
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.width, Some(2));
        assert_eq!(image.height, Some(3));
        assert_eq!(image.ext.as_deref(), Some("jpeg"));
    }
}
