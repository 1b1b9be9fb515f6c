//! Binary record and compound file fixtures.

use std::io::{Cursor, Write};

use cfb::CompoundFile;

const RT_DOCUMENT: u16 = 0x03E8;
const RT_TEXT_HEADER_ATOM: u16 = 0x0F9F;
const RT_TEXT_BYTES_ATOM: u16 = 0x0FA8;

fn record(rec_ver: u16, rec_type: u16, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + content.len());
    out.extend_from_slice(&rec_ver.to_le_bytes());
    out.extend_from_slice(&rec_type.to_le_bytes());
    out.extend_from_slice(&(content.len() as u32).to_le_bytes());
    out.extend_from_slice(content);
    out
}

/// An atom record.
pub fn atom(rec_type: u16, content: &[u8]) -> Vec<u8> {
    record(0x00, rec_type, content)
}

/// A container record wrapping already-encoded children.
pub fn container(rec_type: u16, children: &[u8]) -> Vec<u8> {
    record(0x0F, rec_type, children)
}

/// A text header atom followed by a single-byte text atom.
pub fn text_atoms(text_type: u32, text: &str) -> Vec<u8> {
    let mut out = atom(RT_TEXT_HEADER_ATOM, &text_type.to_le_bytes());
    out.extend(atom(RT_TEXT_BYTES_ATOM, text.as_bytes()));
    out
}

/// A document stream: `prefix` records, then a document container holding
/// `body`, zero-padded to a plausible size.
pub fn document_stream(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = prefix.to_vec();
    out.extend(container(RT_DOCUMENT, body));
    if out.len() < 1024 {
        out.resize(1024, 0);
    }
    out
}

/// A compound file holding `stream` as its PowerPoint Document stream.
pub fn build_ppt(stream: &[u8]) -> Vec<u8> {
    let mut comp = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    {
        let mut document = comp.create_stream("/PowerPoint Document").unwrap();
        document.write_all(stream).unwrap();
        document.flush().unwrap();
    }
    {
        let mut user = comp.create_stream("/Current User").unwrap();
        user.write_all(&[0; 20]).unwrap();
        user.flush().unwrap();
    }
    comp.flush().unwrap();
    comp.into_inner().into_inner()
}
