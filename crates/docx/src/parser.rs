//! DOCX package parser.

use std::io::{Read, Seek};

use docex_core::model::FlowDocument;
use docex_core::{Error, Result};
use docex_opc::Package;

use crate::body::parse_body;
use crate::styles::StyleTable;

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const DEFAULT_DOCUMENT: &str = "word/document.xml";

/// Parser for DOCX (Office Open XML) files.
pub struct DocxParser;

impl DocxParser {
    /// Create a new DOCX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a DOCX package from a reader into a flow document.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<FlowDocument> {
        let mut package = Package::open(reader)?;
        let main = main_partname(&mut package)?;

        let styles = self.read_styles(&mut package, &main)?;
        let xml = package.read_string(&main)?;
        let body = parse_body(&xml, &styles)?;
        let rels = package.relationships(&main)?;

        log::debug!(
            "{}: {} paragraphs, {} tables, {} drawings",
            main,
            body.paragraphs.len(),
            body.tables.len(),
            body.drawings.len()
        );

        Ok(FlowDocument {
            paragraphs: body.paragraphs,
            tables: body.tables,
            inline_shapes: body.inline_shapes,
            drawings: body.drawings,
            rels,
        })
    }

    /// Style table of the main part; a document without styles has an empty one.
    fn read_styles<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        main: &str,
    ) -> Result<StyleTable> {
        let target = package
            .read_rels(main)?
            .into_iter()
            .find(|rel| rel.reltype == STYLES_REL)
            .map(|rel| rel.target);
        match target {
            Some(target) if package.contains(&target) => {
                StyleTable::parse(&package.read_string(&target)?)
            }
            _ => {
                log::debug!("{} has no styles part", main);
                Ok(StyleTable::default())
            }
        }
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Part name of the main document part, from the package relationships.
fn main_partname<R: Read + Seek>(package: &mut Package<R>) -> Result<String> {
    let target = package
        .read_rels("")?
        .into_iter()
        .find(|rel| rel.reltype == OFFICE_DOCUMENT_REL)
        .map(|rel| rel.target);
    match target {
        Some(target) => Ok(target),
        None if package.contains(DEFAULT_DOCUMENT) => Ok(DEFAULT_DOCUMENT.to_string()),
        None => Err(Error::CorruptedFile("package has no main document part".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_docx;
    use std::io::Cursor;

    #[test]
    fn test_parse_package() {
        let bytes = build_docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
            <w:p><w:r><w:t>Body text</w:t></w:r></w:p>
            <w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r>
            <w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
            <w:p><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1"/><a:graphic>
            <a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId4"/></pic:blipFill></pic:pic>
            </a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        );
        let doc = DocxParser::new().parse(Cursor::new(bytes)).unwrap();

        assert_eq!(doc.paragraphs.len(), 3);
        assert_eq!(doc.paragraphs[0].style.as_deref(), Some("heading 1"));
        assert_eq!(doc.paragraphs[1].style.as_deref(), Some("Normal"));
        assert_eq!(doc.tables[0].style.as_deref(), Some("Table Grid"));
        assert_eq!(doc.tables[0].rows, vec![vec!["cell"]]);

        let embed = doc.inline_shapes[0].embed.as_deref().unwrap();
        assert_eq!(doc.rels.related_part(embed).unwrap().blob, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(doc.rels.external_target("rId9"), Some("https://example.com"));
    }

    #[test]
    fn test_missing_main_part() {
        use std::io::Write;
        use zip::write::FileOptions;
        use zip::ZipWriter;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("docProps/core.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<cp:coreProperties/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = DocxParser::new().parse(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::CorruptedFile(_)));
    }
}
