//! JSON and CSV files in an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use docex_core::{DataKind, TableEntry};
use serde::Serialize;

use crate::error::Result;
use crate::{Storage, StoreData};

const TABLE_HEADER: [&str; 4] = ["Table Index", "Style", "Rows", "Columns"];

/// Writes `extracted_<kind>.json` files and `table_<n>.csv` files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    output_dir: PathBuf,
}

impl FileStorage {
    /// Use `output_dir`, creating it if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_json<T: Serialize>(&self, kind: DataKind, records: &[T]) -> Result<()> {
        let path = self.output_dir.join(format!("extracted_{}.json", kind));
        fs::write(&path, serde_json::to_string_pretty(records)?)?;
        log::info!("{} data saved to {}", kind, path.display());
        Ok(())
    }

    fn write_tables(&self, entries: &[TableEntry]) -> Result<()> {
        for (i, entry) in entries.iter().enumerate() {
            let path = self.output_dir.join(format!("table_{}.csv", i + 1));
            fs::write(&path, table_csv(entry))?;
            log::info!("Table {} data saved to {}", i + 1, path.display());
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn store_data(&mut self, data: StoreData<'_>) -> Result<()> {
        match data {
            StoreData::Text(records) => self.write_json(DataKind::Text, records),
            StoreData::Links(records) => self.write_json(DataKind::Links, records),
            StoreData::Images(records) => self.write_json(DataKind::Images, records),
            StoreData::Tables(entries) => self.write_tables(entries),
        }
    }
}

/// CSV for one entry: the metadata header, its values, a blank row, then the
/// grid. A warning keeps the layout with empty metadata and its message as
/// the only grid row.
fn table_csv(entry: &TableEntry) -> String {
    let mut out = String::new();
    push_row(&mut out, TABLE_HEADER.iter().copied());

    match entry {
        TableEntry::Table(table) => {
            let values = [
                table.table_index.to_string(),
                table.style.clone(),
                table.rows.to_string(),
                table.columns.to_string(),
            ];
            push_row(&mut out, values.iter().map(String::as_str));
            push_row(&mut out, std::iter::empty());
            for row in &table.data {
                push_row(&mut out, row.iter().map(String::as_str));
            }
        }
        TableEntry::Warning { warning } => {
            push_row(&mut out, ["", "", "", ""].into_iter());
            push_row(&mut out, std::iter::empty());
            push_row(&mut out, std::iter::once(warning.as_str()));
        }
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let fields: Vec<String> = fields.map(quote_field).collect();
    out.push_str(&fields.join(","));
    out.push_str("\r\n");
}

/// Quote a field holding a delimiter, quote or line break.
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
