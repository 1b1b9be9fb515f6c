//! Result container shared by the four extraction operations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Records produced by one extraction call, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    /// Items skipped because they could not be read.
    pub skipped: usize,
}

impl<T> Extraction<T> {
    /// Create an empty extraction.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    /// Count one skipped item.
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was produced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard the skip count and keep the records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Base64 (standard alphabet, padded) of raw bytes.
pub fn encode_blob(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
