//! In-memory PDF fixtures built with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// A content-stream step of a fixture page.
pub enum TextOp {
    /// Set the RGB fill color.
    Color(f32, f32, f32),
    /// Show a string at an absolute user-space position.
    Show(f32, f32, &'static str),
}

/// A one-page US Letter document using `Helvetica-Bold` as `F1`.
pub fn simple_pdf(ops: &[TextOp]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = Vec::new();
    for op in ops {
        match op {
            TextOp::Color(r, g, b) => {
                operations.push(Operation::new("rg", vec![(*r).into(), (*g).into(), (*b).into()]))
            }
            TextOp::Show(x, y, text) => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn first_page(doc: &Document) -> ObjectId {
    doc.get_pages().into_iter().next().map(|(_, id)| id).unwrap()
}

fn resources_id(doc: &Document) -> ObjectId {
    let page = doc.get_dictionary(first_page(doc)).unwrap();
    let parent = page.get(b"Parent").unwrap().as_reference().unwrap();
    let pages = doc.get_dictionary(parent).unwrap();
    pages.get(b"Resources").unwrap().as_reference().unwrap()
}

/// Attach an Info dictionary with a title and an author.
pub fn with_info(doc: &mut Document, title: &str, author: &str) {
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Author" => Object::string_literal(author),
    });
    doc.trailer.set("Info", info_id);
}

/// Add a URI link annotation at user-space `[72 700 200 720]`.
pub fn with_link(doc: &mut Document, uri: &str) {
    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 700.into(), 200.into(), 720.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(uri),
        },
    });
    let page_id = first_page(doc);
    let page = doc.get_dictionary_mut(page_id).unwrap();
    page.set("Annots", vec![Object::Reference(annot_id)]);
}

/// Register a 2x3 JPEG image XObject as `Im1`.
pub fn with_image(doc: &mut Document, bytes: &[u8]) {
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 3,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        bytes.to_vec(),
    ));
    let resources_id = resources_id(doc);
    let resources = doc.get_dictionary_mut(resources_id).unwrap();
    resources.set(
        "XObject",
        dictionary! {
            "Im1" => image_id,
        },
    );
}

/// Write `doc` to a temporary `.pdf` file.
pub fn save_temp(doc: &mut Document) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    doc.save(file.path()).unwrap();
    file
}
