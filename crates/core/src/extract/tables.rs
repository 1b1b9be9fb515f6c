//! Table extraction.

use std::path::Path;

use log::{debug, warn};

use crate::backend::LayoutBackend;
use crate::dispatch::{route, DataKind, Route};
use crate::document::Document;
use crate::error::Result;
use crate::extraction::Extraction;
use crate::model::{FlowDocument, ShapeKind, SlideDeck, TableGrid};
use crate::records::{TableEntry, TableRecord};

/// Style label for flow tables without a style.
pub const DEFAULT_TABLE_STYLE: &str = "DefaultTableStyle";

/// Style label of slide tables.
pub const SLIDE_TABLE_STYLE: &str = "DefaultPPTTable";

/// Style label of tables detected on pages.
pub const PAGE_TABLE_STYLE: &str = "N/A";

/// Warning emitted for page streams when no layout backend is configured.
pub const NO_LAYOUT_BACKEND: &str = "No layout backend configured for PDF table extraction.";

/// Extract table entries from an opened document.
///
/// Page streams carry no table model of their own: `source` is reopened by
/// the layout backend, which detects at most one table per page.
pub fn extract_tables(
    document: &Document,
    source: &Path,
    layout: Option<&dyn LayoutBackend>,
) -> Result<Extraction<TableEntry>> {
    Ok(match route(document, DataKind::Tables)? {
        Route::Pages(_) | Route::LegacyPages(_) => layout_tables(source, layout),
        Route::Flow(doc) => flow_tables(doc),
        Route::Slides(deck) => slide_tables(deck),
    })
}

/// Row-major grid of trimmed cell texts.
fn trimmed_grid(table: &TableGrid) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
        .collect()
}

fn flow_tables(doc: &FlowDocument) -> Extraction<TableEntry> {
    let mut out = Extraction::new();
    for (i, table) in doc.tables.iter().enumerate() {
        let style = table.style.as_deref().unwrap_or(DEFAULT_TABLE_STYLE);
        out.push(TableEntry::Table(TableRecord::new(
            i + 1,
            style,
            trimmed_grid(table),
        )));
    }
    out
}

fn slide_tables(deck: &SlideDeck) -> Extraction<TableEntry> {
    let mut out = Extraction::new();
    let mut counter = 0;

    for (index, slide) in deck.slides.iter().enumerate() {
        for shape in &slide.shapes {
            let ShapeKind::Table(table) = &shape.kind else {
                continue;
            };
            let table = match table {
                Ok(table) => table,
                Err(broken) => {
                    debug!("skipping table on slide {}: {}", index + 1, broken);
                    out.skip();
                    continue;
                }
            };
            let grid = trimmed_grid(table);
            if grid.is_empty() {
                continue;
            }
            counter += 1;
            out.push(TableEntry::Table(
                TableRecord::new(counter, SLIDE_TABLE_STYLE, grid).on_slide(index + 1),
            ));
        }
    }
    out
}

fn layout_tables(source: &Path, layout: Option<&dyn LayoutBackend>) -> Extraction<TableEntry> {
    let mut out = Extraction::new();
    let Some(backend) = layout else {
        out.push(TableEntry::warning(NO_LAYOUT_BACKEND));
        return out;
    };

    match detect_tables(backend, source, &mut out) {
        Ok(()) if out.is_empty() => {
            out.push(TableEntry::warning(format!(
                "No tables found with {}.",
                backend.name()
            )));
        }
        Ok(()) => {}
        Err(e) => {
            warn!("{} table extraction failed: {}", backend.name(), e);
            out.push(TableEntry::warning(format!(
                "Error extracting tables with {}: {}",
                backend.name(),
                e
            )));
        }
    }
    out
}

/// Push one table per page that has one; stops at the first backend error.
fn detect_tables(
    backend: &dyn LayoutBackend,
    source: &Path,
    out: &mut Extraction<TableEntry>,
) -> Result<()> {
    let mut session = backend.open(source)?;
    for page in 0..session.page_count() {
        let Some(rows) = session.extract_table(page)? else {
            continue;
        };
        if rows.is_empty() {
            continue;
        }
        let grid = rows
            .into_iter()
            .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
            .collect();
        let index = out.len() + 1;
        out.push(TableEntry::Table(
            TableRecord::new(index, PAGE_TABLE_STYLE, grid).on_page(page + 1),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ForeignDocument;
    use crate::model::{Broken, PageCollection, PageStream, Shape, Slide};
    use crate::testing::FakeLayout;

    fn cells(row: &[&str]) -> Vec<Option<String>> {
        row.iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    #[test]
    fn test_flow_tables() {
        let mut doc = FlowDocument::new();
        doc.tables = vec![
            TableGrid::from_rows(vec![vec![" a ", "b"], vec!["c"]]).with_style("Light Grid"),
            TableGrid::default(),
        ];
        let out = extract_tables(&Document::from(doc), Path::new("x.docx"), None).unwrap();

        let first = out.records[0].as_table().unwrap();
        assert_eq!(first.table_index, 1);
        assert_eq!(first.style, "Light Grid");
        assert_eq!(first.data, vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!((first.rows, first.columns), (2, 2));

        let second = out.records[1].as_table().unwrap();
        assert_eq!(second.style, DEFAULT_TABLE_STYLE);
        assert_eq!((second.rows, second.columns), (0, 0));
    }

    #[test]
    fn test_slide_table_grades() {
        let grid = TableGrid::from_rows(vec![
            vec!["Name", "Grade", "Remark"],
            vec!["Alice", "X", "Good"],
        ]);
        let deck = SlideDeck::new(vec![Slide::new(vec![
            Shape::text_box(1, "Grades"),
            Shape::table(2, Ok(grid)),
        ])]);
        let out = extract_tables(&Document::from(deck), Path::new("x.pptx"), None).unwrap();

        assert_eq!(out.len(), 1);
        let table = out.records[0].as_table().unwrap();
        assert_eq!(table.data[0], vec!["Name", "Grade", "Remark"]);
        assert_eq!(table.rows, 2);
        assert_eq!(table.columns, 3);
        assert_eq!(table.slide, Some(1));
        assert_eq!(table.style, SLIDE_TABLE_STYLE);
    }

    #[test]
    fn test_slide_table_counter_is_deck_wide() {
        let grid = || Ok(TableGrid::from_rows(vec![vec!["x"]]));
        let deck = SlideDeck::new(vec![
            Slide::new(vec![
                Shape::table(1, grid()),
                Shape::table(2, Err(Broken::new("unreadable"))),
                Shape::table(3, Ok(TableGrid::default())),
            ]),
            Slide::new(vec![Shape::table(4, grid())]),
        ]);
        let out = extract_tables(&Document::from(deck), Path::new("x.pptx"), None).unwrap();

        let indexes: Vec<_> = out
            .records
            .iter()
            .map(|e| {
                let t = e.as_table().unwrap();
                (t.table_index, t.slide)
            })
            .collect();
        assert_eq!(indexes, vec![(1, Some(1)), (2, Some(2))]);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn test_page_tables_without_backend() {
        let doc = Document::from(PageStream::new());
        let out = extract_tables(&doc, Path::new("x.pdf"), None).unwrap();
        assert_eq!(out.records, vec![TableEntry::warning(NO_LAYOUT_BACKEND)]);
    }

    #[test]
    fn test_page_tables_detected() {
        let layout = FakeLayout::with_tables(vec![
            Ok(Some(vec![cells(&["A", "B"]), cells(&["1", ""])])),
            Ok(None),
            Ok(Some(vec![cells(&["only"])])),
        ]);
        let doc = Document::from(PageCollection::new("x.pdf", vec![]));
        let out = extract_tables(&doc, Path::new("x.pdf"), Some(&layout)).unwrap();

        assert_eq!(out.len(), 2);
        let first = out.records[0].as_table().unwrap();
        assert_eq!(first.page, Some(1));
        assert_eq!(first.style, "N/A");
        assert_eq!(first.data, vec![vec!["A", "B"], vec!["1", ""]]);
        let second = out.records[1].as_table().unwrap();
        assert_eq!((second.table_index, second.page), (2, Some(3)));
        assert!(layout.session_closed());
    }

    #[test]
    fn test_page_tables_none_found() {
        let layout = FakeLayout::with_tables(vec![Ok(None), Ok(Some(vec![]))]);
        let out = extract_tables(
            &Document::from(PageStream::new()),
            Path::new("x.pdf"),
            Some(&layout),
        )
        .unwrap();
        assert_eq!(
            out.records,
            vec![TableEntry::warning("No tables found with fake-layout.")]
        );
    }

    #[test]
    fn test_page_tables_error_keeps_found_tables() {
        let layout = FakeLayout::with_tables(vec![
            Ok(Some(vec![cells(&["A"])])),
            Err("page 2 is corrupt".into()),
            Ok(Some(vec![cells(&["never"])])),
        ]);
        let out = extract_tables(
            &Document::from(PageStream::new()),
            Path::new("x.pdf"),
            Some(&layout),
        )
        .unwrap();

        assert_eq!(out.len(), 2);
        assert!(out.records[0].as_table().is_some());
        assert_eq!(
            out.records[1].as_warning(),
            Some("Error extracting tables with fake-layout: fake-layout failed: page 2 is corrupt")
        );
        assert!(layout.session_closed());
    }

    #[test]
    fn test_page_tables_open_failure() {
        let layout = FakeLayout::failing_open("no such file");
        let out = extract_tables(
            &Document::from(PageStream::new()),
            Path::new("x.pdf"),
            Some(&layout),
        )
        .unwrap();
        assert_eq!(
            out.records[0].as_warning(),
            Some("Error extracting tables with fake-layout: fake-layout failed: no such file")
        );
    }

    #[test]
    fn test_unsupported_document() {
        let doc = Document::Foreign(ForeignDocument::new("spreadsheet"));
        let err = extract_tables(&doc, Path::new("x.xlsx"), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type for table extraction: spreadsheet"
        );
    }
}
