//! Style names from `word/styles.xml`.

use std::collections::HashMap;

use docex_core::{Error, Result};
use docex_opc::xml::{attr, attr_bool, local_name};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Style ids mapped to their display names.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleTable {
    /// Parse a styles part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut table = Self::default();
        // (id, is default paragraph style) of the open w:style
        let mut current: Option<(String, bool)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"style" => {
                    let is_default = attr(e, b"type").as_deref() == Some("paragraph")
                        && attr_bool(e, b"default") == Some(true);
                    current = attr(e, b"styleId").map(|id| (id, is_default));
                }
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"name" =>
                {
                    if let (Some((id, is_default)), Some(name)) =
                        (current.as_ref(), attr(e, b"val"))
                    {
                        if *is_default {
                            table.default_paragraph = Some(name.clone());
                        }
                        table.names.insert(id.clone(), name);
                    }
                }
                Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"style" => {
                    current = None;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing styles: {}", e)));
                }
                _ => {}
            }
        }

        Ok(table)
    }

    /// Display name of a style id; unknown ids name themselves.
    pub fn name(&self, style_id: &str) -> String {
        self.names
            .get(style_id)
            .cloned()
            .unwrap_or_else(|| style_id.to_string())
    }

    /// Style name of a paragraph, falling back to the default paragraph style.
    pub fn paragraph_style(&self, style_id: Option<&str>) -> Option<String> {
        match style_id {
            Some(id) => Some(self.name(id)),
            None => self.default_paragraph.clone(),
        }
    }
}
