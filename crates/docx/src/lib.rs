//! DOCX (Office Open XML) loader.
//!
//! Opens `.docx` archives into a [`FlowDocument`]: body paragraphs with
//! their runs, body tables, inline shapes, drawings and the image parts
//! they reference.
//!
//! [`FlowDocument`]: docex_core::model::FlowDocument

pub mod body;
pub mod loader;
pub mod parser;
pub mod styles;

pub use loader::DocxLoader;
pub use parser::DocxParser;

#[cfg(test)]
mod testing;
