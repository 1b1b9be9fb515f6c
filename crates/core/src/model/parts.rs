//! Package parts and relationship tables shared by the flow and slide models.

use std::fmt;
use std::sync::Arc;

/// Failure recorded by a loader for an item it could not materialize.
///
/// Extractors treat a broken item as a per-item failure: the item is skipped
/// and counted, the traversal continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broken(pub String);

impl Broken {
    /// Create a new broken marker with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An item that may have failed to load.
pub type Fallible<T> = std::result::Result<T, Broken>;

/// A binary part of a package (an embedded image, usually).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part name inside the package, e.g. `ppt/media/image1.png`.
    pub partname: String,

    /// Raw, undecoded bytes.
    pub blob: Vec<u8>,
}

impl Part {
    /// Create a new part.
    pub fn new(partname: impl Into<String>, blob: Vec<u8>) -> Self {
        Self {
            partname: partname.into(),
            blob,
        }
    }

    /// Lowercased extension of the part name, if any.
    pub fn ext(&self) -> Option<String> {
        let file = self.partname.rsplit('/').next().unwrap_or(&self.partname);
        file.rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Where a relationship points.
#[derive(Debug, Clone)]
pub enum RelTarget {
    /// A part loaded into memory.
    Part(Arc<Part>),
    /// An external target (hyperlinks).
    External(String),
    /// An internal part the loader did not read (layouts, notes, media).
    Unloaded(String),
    /// An internal part referenced but absent from the package.
    Missing(String),
}

/// One entry of a relationship table.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Opaque relationship id, e.g. `rId3`.
    pub id: String,
    /// Relationship type URI.
    pub reltype: String,
    /// Resolved target.
    pub target: RelTarget,
}

impl Relationship {
    /// Whether the relationship type marks an image.
    pub fn is_image(&self) -> bool {
        self.reltype.contains("image")
    }

    /// The loaded target part, or the reason it cannot be produced.
    pub fn target_part(&self) -> Fallible<&Arc<Part>> {
        match &self.target {
            RelTarget::Part(part) => Ok(part),
            RelTarget::External(url) => Err(Broken(format!(
                "relationship '{}' is external: {}",
                self.id, url
            ))),
            RelTarget::Unloaded(name) => Err(Broken(format!(
                "relationship '{}' targets unloaded part {}",
                self.id, name
            ))),
            RelTarget::Missing(name) => Err(Broken(format!(
                "relationship '{}' targets missing part {}",
                self.id, name
            ))),
        }
    }
}

/// Per-part relationship table, keyed by relationship id, in package order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a relationship.
    pub fn push(&mut self, rel: Relationship) {
        self.entries.push(rel);
    }

    /// Register an in-memory part under a relationship id.
    pub fn insert_part(&mut self, id: impl Into<String>, reltype: impl Into<String>, part: Part) {
        self.push(Relationship {
            id: id.into(),
            reltype: reltype.into(),
            target: RelTarget::Part(Arc::new(part)),
        });
    }

    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// The loaded part behind a relationship id, if present.
    pub fn related_part(&self, id: &str) -> Option<&Arc<Part>> {
        self.get(id).and_then(|rel| rel.target_part().ok())
    }

    /// External target (URL) behind a relationship id, if present.
    pub fn external_target(&self, id: &str) -> Option<&str> {
        match self.get(id).map(|rel| &rel.target) {
            Some(RelTarget::External(url)) => Some(url),
            _ => None,
        }
    }

    /// Iterate over relationships in package order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoded picture: the image part plus its pixel size when known.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// The image part.
    pub part: Arc<Part>,
    /// Pixel width.
    pub width: Option<u32>,
    /// Pixel height.
    pub height: Option<u32>,
}

impl ImageData {
    /// Wrap a part without pixel size information.
    pub fn new(part: Arc<Part>) -> Self {
        Self {
            part,
            width: None,
            height: None,
        }
    }

    /// Set the pixel size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Raw image bytes.
    pub fn blob(&self) -> &[u8] {
        &self.part.blob
    }

    /// Canonical file extension, e.g. `png`; JPEG parts report `jpg`.
    pub fn ext(&self) -> Option<String> {
        self.part.ext().map(|ext| match ext.as_str() {
            "jpeg" | "jpe" => "jpg".to_string(),
            "tif" => "tiff".to_string(),
            _ => ext,
        })
    }
}
