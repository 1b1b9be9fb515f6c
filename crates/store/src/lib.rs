//! Persistence for extraction records.
//!
//! - [`FileStorage`] writes pretty JSON files and one CSV per table into an
//!   output directory.
//! - [`SqlStorage`] inserts one row per record into a SQLite database.
//!
//! Both consume the four record sequences unchanged, labeled by
//! [`DataKind`](docex_core::DataKind).

pub mod error;
pub mod file;
pub mod sql;

#[cfg(test)]
mod testing;

pub use error::{Result, StoreError};
pub use file::FileStorage;
pub use sql::SqlStorage;

use docex_core::{DataKind, ImageRecord, LinkRecord, TableEntry, TextRecord};

/// One record sequence handed to a storage.
#[derive(Debug, Clone, Copy)]
pub enum StoreData<'a> {
    Text(&'a [TextRecord]),
    Links(&'a [LinkRecord]),
    Images(&'a [ImageRecord]),
    Tables(&'a [TableEntry]),
}

impl StoreData<'_> {
    /// Label of the sequence.
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Text(_) => DataKind::Text,
            Self::Links(_) => DataKind::Links,
            Self::Images(_) => DataKind::Images,
            Self::Tables(_) => DataKind::Tables,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(records) => records.len(),
            Self::Links(records) => records.len(),
            Self::Images(records) => records.len(),
            Self::Tables(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A destination for extraction records.
pub trait Storage {
    /// Persist one record sequence.
    fn store_data(&mut self, data: StoreData<'_>) -> Result<()>;
}
