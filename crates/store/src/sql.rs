//! SQLite storage.

use std::path::Path;

use docex_core::{ImageRecord, LinkRecord, TableEntry, TextRecord};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::{Storage, StoreData};

/// Create the record tables if they don't exist.
fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS text_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_or_slide INTEGER,
            content TEXT
        );
        CREATE TABLE IF NOT EXISTS links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_or_slide INTEGER,
            text TEXT,
            url TEXT
        );
        CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            page_or_slide INTEGER,
            name TEXT,
            format TEXT,
            width INTEGER,
            height INTEGER
        );
        CREATE TABLE IF NOT EXISTS tables (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            table_index INTEGER,
            data TEXT,
            rows INTEGER,
            columns INTEGER
        );",
    )?;
    Ok(())
}

fn as_sql_int(n: Option<usize>) -> Option<i64> {
    n.map(|n| n as i64)
}

/// Inserts one row per record; each sequence is written in one transaction.
pub struct SqlStorage {
    conn: Connection,
}

impl SqlStorage {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Use an existing connection.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn insert_text(&mut self, records: &[TextRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            tx.execute(
                "INSERT INTO text_data (page_or_slide, content) VALUES (?1, ?2)",
                params![as_sql_int(record.location()), serde_json::to_string(record)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_links(&mut self, records: &[LinkRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            tx.execute(
                "INSERT INTO links (page_or_slide, text, url) VALUES (?1, ?2, ?3)",
                params![as_sql_int(record.location()), record.text(), record.url()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_images(&mut self, records: &[ImageRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            let (width, height) = record.dimensions();
            tx.execute(
                "INSERT INTO images (page_or_slide, name, format, width, height)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    as_sql_int(record.location()),
                    record.name(),
                    record.format(),
                    width,
                    height
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_tables(&mut self, entries: &[TableEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for entry in entries {
            let Some(table) = entry.as_table() else {
                log::debug!(
                    "not storing table warning: {}",
                    entry.as_warning().unwrap_or_default()
                );
                continue;
            };
            tx.execute(
                "INSERT INTO tables (table_index, data, rows, columns) VALUES (?1, ?2, ?3, ?4)",
                params![
                    table.table_index as i64,
                    serde_json::to_string(&table.data)?,
                    table.rows as i64,
                    table.columns as i64
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl Storage for SqlStorage {
    fn store_data(&mut self, data: StoreData<'_>) -> Result<()> {
        log::debug!("storing {} {} records", data.len(), data.kind());
        match data {
            StoreData::Text(records) => self.insert_text(records),
            StoreData::Links(records) => self.insert_links(records),
            StoreData::Images(records) => self.insert_images(records),
            StoreData::Tables(entries) => self.insert_tables(entries),
        }
    }
}
