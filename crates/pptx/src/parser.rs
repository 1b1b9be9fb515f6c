//! PPTX package parser.

use std::io::{Read, Seek};

use docex_core::model::{Slide, SlideDeck};
use docex_core::{Error, Result};
use docex_opc::xml::local_name;
use docex_opc::{Package, RawRelationship};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::shapes::parse_shape_tree;

pub(crate) const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

const DEFAULT_PRESENTATION: &str = "ppt/presentation.xml";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX package from a reader into a slide deck.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<SlideDeck> {
        let mut package = Package::open(reader)?;
        let slide_order = self.get_slide_order(&mut package)?;
        log::debug!("presentation has {} slides", slide_order.len());

        let mut deck = SlideDeck::default();
        for slide_path in &slide_order {
            deck.slides.push(self.parse_slide(&mut package, slide_path)?);
        }
        Ok(deck)
    }

    /// Ordered slide part names: the `p:sldIdLst` order of the presentation
    /// part, or the numbering of the slide relationships when it has none.
    fn get_slide_order<R: Read + Seek>(&self, package: &mut Package<R>) -> Result<Vec<String>> {
        let presentation = presentation_partname(package)?;
        let rels = package.read_rels(&presentation)?;
        let slide_rels: Vec<&RawRelationship> =
            rels.iter().filter(|rel| is_slide_rel(&rel.reltype)).collect();

        let xml = package.read_string(&presentation)?;
        let listed = slide_id_list(&xml)?;
        if !listed.is_empty() {
            return Ok(listed
                .iter()
                .filter_map(|r_id| match slide_rels.iter().find(|rel| &rel.id == r_id) {
                    Some(rel) => Some(rel.target.clone()),
                    None => {
                        log::warn!("slide id list references unknown relationship '{}'", r_id);
                        None
                    }
                })
                .collect());
        }

        let mut slides: Vec<(String, Option<usize>)> = slide_rels
            .iter()
            .map(|rel| {
                let order_num =
                    extract_slide_number(&rel.target).or_else(|| extract_slide_number(&rel.id));
                (rel.target.clone(), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide part and its relationship table.
    fn parse_slide<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        slide_path: &str,
    ) -> Result<Slide> {
        let content = package.read_string(slide_path)?;
        let rels = package.relationships(slide_path)?;
        let shapes = parse_shape_tree(&content, &rels)?;
        Ok(Slide { shapes, rels })
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Part name of the main presentation part, from the package relationships.
fn presentation_partname<R: Read + Seek>(package: &mut Package<R>) -> Result<String> {
    let target = package
        .read_rels("")?
        .into_iter()
        .find(|rel| rel.reltype == OFFICE_DOCUMENT_REL)
        .map(|rel| rel.target);
    match target {
        Some(target) => Ok(target),
        None if package.contains(DEFAULT_PRESENTATION) => Ok(DEFAULT_PRESENTATION.to_string()),
        None => Err(Error::CorruptedFile(
            "package has no presentation part".to_string(),
        )),
    }
}

/// Whether a relationship type points at a slide (not a layout, master or notes slide).
fn is_slide_rel(reltype: &str) -> bool {
    reltype.ends_with("/slide")
}

/// Relationship ids of `p:sldId` entries, in presentation order.
fn slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // `id` is the numeric slide id, `r:id` the relationship
                let r_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() != b"id" && local_name(a.key.as_ref()) == b"id");
                if let Some(a) = r_id {
                    ids.push(String::from_utf8_lossy(&a.value).into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_pptx;
    use docex_core::model::ShapeKind;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn titles(deck: &SlideDeck) -> Vec<String> {
        deck.slides
            .iter()
            .map(|s| s.shapes[0].text_content().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_slide_order_follows_id_list() {
        let bytes = build_pptx(3, &[3, 1, 2]);
        let deck = PptxParser::new().parse(Cursor::new(bytes)).unwrap();
        assert_eq!(titles(&deck), vec!["Slide 3", "Slide 1", "Slide 2"]);
        assert!(matches!(deck.slides[0].shapes[0].kind, ShapeKind::AutoShape));
    }

    #[test]
    fn test_slide_order_falls_back_to_numbering() {
        let bytes = build_pptx(11, &[]);
        let deck = PptxParser::new().parse(Cursor::new(bytes)).unwrap();
        let titles = titles(&deck);
        assert_eq!(titles.len(), 11);
        assert_eq!(titles[1], "Slide 2");
        assert_eq!(titles[10], "Slide 11");
    }

    #[test]
    fn test_slide_id_list_reads_relationship_ids() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst>
            <p:sldId id="256" r:id="rId7"/></p:sldIdLst></p:presentation>"#;
        assert_eq!(slide_id_list(xml).unwrap(), vec!["rId7".to_string()]);
    }

    #[test]
    fn test_missing_presentation_part() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("docProps/app.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<Properties/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = PptxParser::new().parse(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::CorruptedFile(_)));
    }
}
