//! Text-gap table detection over layout text.
//!
//! pdf-extract lays out page text with runs of spaces between text that
//! was drawn apart on the page. A table shows up as consecutive lines that
//! split into the same number of columns on those gaps.

use docex_core::DetectedCell;

/// Detection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Minimum number of consecutive rows.
    pub min_rows: usize,
    /// Minimum number of columns per row.
    pub min_columns: usize,
    /// Minimum run of spaces separating two columns.
    pub min_gap: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            min_gap: 2,
        }
    }
}

/// Split a line into cells on runs of at least `min_gap` spaces.
/// Tabs count as a gap on their own.
pub fn split_columns(line: &str, min_gap: usize) -> Vec<DetectedCell> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut spaces = 0;

    for c in line.trim().chars() {
        match c {
            ' ' => spaces += 1,
            '\t' => spaces = spaces.max(min_gap),
            _ => {
                if spaces >= min_gap {
                    cells.push(std::mem::take(&mut current));
                } else {
                    current.extend(std::iter::repeat(' ').take(spaces));
                }
                spaces = 0;
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        cells.push(current);
    }

    cells
        .into_iter()
        .map(|cell| {
            let cell = cell.trim().to_string();
            (!cell.is_empty()).then_some(cell)
        })
        .collect()
}

/// The longest run of consecutive lines sharing a column count that meets
/// the thresholds. Earlier runs win ties.
pub fn detect_table(text: &str, config: &TableConfig) -> Option<Vec<Vec<DetectedCell>>> {
    let rows: Vec<Vec<DetectedCell>> = text
        .lines()
        .map(|line| split_columns(line, config.min_gap))
        .collect();

    let mut best: Option<(usize, usize)> = None;
    let mut start = 0;
    while start < rows.len() {
        let columns = rows[start].len();
        let mut end = start + 1;
        while end < rows.len() && rows[end].len() == columns {
            end += 1;
        }
        let len = end - start;
        if columns >= config.min_columns
            && len >= config.min_rows
            && best.map_or(true, |(_, best_len)| len > best_len)
        {
            best = Some((start, len));
        }
        start = end;
    }

    best.map(|(start, len)| rows[start..start + len].to_vec())
}
