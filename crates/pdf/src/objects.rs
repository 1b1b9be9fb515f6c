//! Helpers over lopdf objects.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Resolve a reference to the object it points at; direct objects pass through.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Dictionary value of `key`, following a reference.
pub fn get_resolved<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|obj| resolve(doc, obj))
}

/// Dictionary behind `obj`, following a reference.
pub fn as_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Numeric value of an integer or real object.
pub fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Name value as a string.
pub fn name(obj: &Object) -> Option<String> {
    match obj {
        Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
        _ => None,
    }
}

/// Page attribute that may be inherited from ancestor page-tree nodes.
pub fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    // page trees are shallow; the bound guards against Parent cycles
    for _ in 0..32 {
        if let Some(value) = get_resolved(doc, node, key) {
            return Some(value);
        }
        node = match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => doc.get_dictionary(*parent).ok()?,
            _ => return None,
        };
    }
    None
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, UTF-8, or Latin-1.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// String value of a text-string object.
pub fn text_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(n) => Some(String::from_utf8_lossy(n).into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"Hello"), "Hello");
        assert_eq!(decode_text_string(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_number_and_text() {
        assert_eq!(number(&Object::Integer(42)), Some(42.0));
        assert_eq!(number(&Object::Real(1.5)), Some(1.5));
        assert_eq!(number(&Object::Null), None);
        assert_eq!(
            text_string(&Object::String(b"Report".to_vec(), StringFormat::Literal)).as_deref(),
            Some("Report")
        );
    }

    #[test]
    fn test_inherited_attribute() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Rotate" => 90,
            }),
        );

        let rotate = inherited(&doc, page_id, b"Rotate").and_then(number);
        assert_eq!(rotate, Some(90.0));
        assert!(inherited(&doc, page_id, b"MediaBox").is_none());
    }
}
