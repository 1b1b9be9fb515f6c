//! Test doubles shared by the engine's unit tests.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use crate::backend::{DetectedCell, LayoutBackend, LayoutSession};
use crate::error::{Error, Result};

type TextOutcome = std::result::Result<Option<String>, String>;
type TableOutcome = std::result::Result<Option<Vec<Vec<DetectedCell>>>, String>;

/// Scripted layout backend: one outcome per page.
pub(crate) struct FakeLayout {
    texts: Vec<TextOutcome>,
    tables: Vec<TableOutcome>,
    open_error: Option<String>,
    closed: Rc<Cell<bool>>,
}

impl FakeLayout {
    pub(crate) fn new(texts: Vec<TextOutcome>) -> Self {
        Self {
            texts,
            tables: Vec::new(),
            open_error: None,
            closed: Rc::new(Cell::new(false)),
        }
    }

    pub(crate) fn with_tables(tables: Vec<TableOutcome>) -> Self {
        Self {
            tables,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn failing_open(reason: &str) -> Self {
        Self {
            open_error: Some(reason.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Whether the last opened session has been dropped.
    pub(crate) fn session_closed(&self) -> bool {
        self.closed.get()
    }
}

impl LayoutBackend for FakeLayout {
    fn name(&self) -> &str {
        "fake-layout"
    }

    fn open(&self, _path: &Path) -> Result<Box<dyn LayoutSession>> {
        if let Some(reason) = &self.open_error {
            return Err(Error::backend("fake-layout", reason));
        }
        self.closed.set(false);
        Ok(Box::new(FakeSession {
            texts: self.texts.clone(),
            tables: self.tables.clone(),
            closed: Rc::clone(&self.closed),
        }))
    }
}

struct FakeSession {
    texts: Vec<TextOutcome>,
    tables: Vec<TableOutcome>,
    closed: Rc<Cell<bool>>,
}

impl LayoutSession for FakeSession {
    fn page_count(&self) -> usize {
        self.texts.len().max(self.tables.len())
    }

    fn layout_text(&mut self, page: usize) -> Result<Option<String>> {
        match self.texts.get(page) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(Error::backend("fake-layout", reason)),
            None => Ok(None),
        }
    }

    fn extract_table(&mut self, page: usize) -> Result<Option<Vec<Vec<DetectedCell>>>> {
        match self.tables.get(page) {
            Some(Ok(table)) => Ok(table.clone()),
            Some(Err(reason)) => Err(Error::backend("fake-layout", reason)),
            None => Ok(None),
        }
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.closed.set(true);
    }
}
