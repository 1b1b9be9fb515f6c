//! In-memory PPTX fixtures.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::parser::OFFICE_DOCUMENT_REL;

const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// A slide holding one title shape with `text`.
pub fn slide_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><p:sld
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/>
            <p:txBody><a:bodyPr/><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#
    )
}

/// A deck of `count` slides whose presentation lists the relationship ids in
/// `order`. Relationship `rIdN` targets `slides/slideN.xml`, titled `Slide N`.
pub fn build_pptx(count: usize, order: &[usize]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    zip.start_file("_rels/.rels", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0"?>
            <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="{OFFICE_DOCUMENT_REL}" Target="ppt/presentation.xml"/>
            </Relationships>"#
    )
    .unwrap();

    zip.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
    let mut rels = String::from(
        r#"<?xml version="1.0"?>
            <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId100"
            Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster"
            Target="slideMasters/slideMaster1.xml"/>"#,
    );
    for n in 1..=count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{SLIDE_REL}" Target="slides/slide{n}.xml"/>"#
        ));
    }
    rels.push_str("</Relationships>");
    zip.write_all(rels.as_bytes()).unwrap();

    zip.start_file("ppt/presentation.xml", options).unwrap();
    let mut pres = String::from(
        r#"<?xml version="1.0"?><p:presentation
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>"#,
    );
    for (i, n) in order.iter().enumerate() {
        pres.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, n));
    }
    pres.push_str("</p:sldIdLst></p:presentation>");
    zip.write_all(pres.as_bytes()).unwrap();

    for n in 1..=count {
        zip.start_file(format!("ppt/slides/slide{n}.xml"), options).unwrap();
        zip.write_all(slide_xml(&format!("Slide {n}")).as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}
