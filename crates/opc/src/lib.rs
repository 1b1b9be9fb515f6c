//! Open Packaging Conventions (OPC) reader for ZIP-based Office documents.
//!
//! Reads parts and relationship tables out of `.docx`/`.pptx` archives and
//! resolves relationship targets into the engine's [`Relationships`] model.
//!
//! [`Relationships`]: docex_core::model::Relationships

pub mod package;
pub mod xml;

pub use package::{rels_path, resolve_target, Package, RawRelationship};
