//! PPTX (Office Open XML) loader.
//!
//! Opens `.pptx` archives into a [`SlideDeck`]: slides in presentation order,
//! each with its recursive shape tree and relationship table.
//!
//! [`SlideDeck`]: docex_core::model::SlideDeck

pub mod loader;
pub mod parser;
pub mod shapes;

pub use loader::PptxLoader;
pub use parser::PptxParser;

#[cfg(test)]
mod testing;
