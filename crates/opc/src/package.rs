//! ZIP package access and relationship resolution.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::sync::Arc;

use docex_core::model::{Part, RelTarget, Relationship, Relationships};
use docex_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::xml::{attr, local_name};

/// One `<Relationship>` entry with its target resolved to a part name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelationship {
    pub id: String,
    pub reltype: String,
    /// Absolute part name for internal targets, the raw URL for external ones.
    pub target: String,
    pub external: bool,
}

/// An opened OPC package.
pub struct Package<R> {
    archive: ZipArchive<R>,
    parts: HashMap<String, Arc<Part>>,
}

impl<R: Read + Seek> Package<R> {
    /// Open a package from a reader over the ZIP bytes.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self {
            archive,
            parts: HashMap::new(),
        })
    }

    /// Whether the package holds a part with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Read a part's bytes.
    pub fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", name, e)))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;

        Ok(content)
    }

    /// Read a part as UTF-8 text.
    pub fn read_string(&mut self, name: &str) -> Result<String> {
        let bytes = self.read_bytes(name)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Parse(format!("'{}' is not valid UTF-8: {}", name, e)))
    }

    /// Relationship entries of a part; a part without a `.rels` file has none.
    pub fn read_rels(&mut self, partname: &str) -> Result<Vec<RawRelationship>> {
        let path = rels_path(partname);
        if !self.contains(&path) {
            return Ok(Vec::new());
        }
        let xml = self.read_string(&path)?;
        parse_rels(&xml, partname)
    }

    /// Relationship table of a part. Image targets are loaded into memory,
    /// other internal targets are recorded by name only.
    pub fn relationships(&mut self, partname: &str) -> Result<Relationships> {
        let mut rels = Relationships::new();
        for raw in self.read_rels(partname)? {
            let target = if raw.external {
                RelTarget::External(raw.target)
            } else if raw.reltype.contains("image") {
                match self.load_part(&raw.target) {
                    Some(part) => RelTarget::Part(part),
                    None => RelTarget::Missing(raw.target),
                }
            } else {
                RelTarget::Unloaded(raw.target)
            };
            rels.push(Relationship {
                id: raw.id,
                reltype: raw.reltype,
                target,
            });
        }
        Ok(rels)
    }

    /// Load a binary part, sharing it between every relationship that targets it.
    fn load_part(&mut self, name: &str) -> Option<Arc<Part>> {
        if let Some(part) = self.parts.get(name) {
            return Some(Arc::clone(part));
        }
        if !self.contains(name) {
            log::debug!("relationship target '{}' is missing from the package", name);
            return None;
        }
        match self.read_bytes(name) {
            Ok(blob) => {
                let part = Arc::new(Part::new(name, blob));
                self.parts.insert(name.to_string(), Arc::clone(&part));
                Some(part)
            }
            Err(e) => {
                log::warn!("could not read part '{}': {}", name, e);
                None
            }
        }
    }
}

/// Name of the relationship part of `partname` (`""` is the package itself).
pub fn rels_path(partname: &str) -> String {
    match partname.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", partname),
    }
}

/// Resolve a relative relationship target against the part that declares it.
pub fn resolve_target(base_partname: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match base_partname.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Parse a `.rels` document declared by `base_partname`.
pub fn parse_rels(xml: &str, base_partname: &str) -> Result<Vec<RawRelationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) else {
                    continue;
                };
                let reltype = attr(e, b"Type").unwrap_or_default();
                let external = attr(e, b"TargetMode").as_deref() == Some("External");
                let target = if external {
                    target
                } else {
                    resolve_target(base_partname, &target)
                };
                rels.push(RawRelationship {
                    id,
                    reltype,
                    target,
                    external,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}
