//! Legacy PPT (OLE/CFB) loader.
//!
//! Parses PowerPoint 97-2003 `.ppt` files, which use the Microsoft Compound
//! File Binary (CFB) format. Best effort: only visible slide text is read.

pub mod loader;
pub mod parser;

pub use loader::PptLoader;
pub use parser::PptParser;

#[cfg(test)]
mod testing;
