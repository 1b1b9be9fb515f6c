//! In-memory DOCX fixtures.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

/// A main document part wrapping `body` in `w:document/w:body`.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document
            xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
            xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
            xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
            <w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

/// A package holding `body`, a styles part and one PNG-named image part
/// behind relationship `rId4`.
pub fn build_docx(body: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
        <Relationship Id="rId1"
        Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"
        Target="word/document.xml"/></Relationships>"#).unwrap();

    zip.start_file("word/_rels/document.xml.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
        <Relationship Id="rId1"
        Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
        Target="styles.xml"/><Relationship Id="rId4"
        Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image"
        Target="media/image1.png"/><Relationship Id="rId9"
        Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink"
        Target="https://example.com" TargetMode="External"/></Relationships>"#).unwrap();

    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0"?>
        <w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
        <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/>
        </w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/>
        </w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/>
        </w:style></w:styles>"#).unwrap();

    zip.start_file("word/media/image1.png", options).unwrap();
    zip.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document_xml(body).as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}
