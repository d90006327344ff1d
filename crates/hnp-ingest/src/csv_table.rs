//! CSV reading into an in-memory string table.
//!
//! Public-health exports are not clean rectangles: World Bank files open
//! with a short preamble (source line, last-updated line, a blank row)
//! before the real header, cells may carry a BOM or stray whitespace, and
//! trailing rows can be ragged. [`read_csv_table`] absorbs all of that and
//! hands downstream stages a rectangular [`CsvTable`].

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// A rectangular table of trimmed string cells under a single header row.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a header, matched case-insensitively on the trimmed name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(wanted))
    }

    /// Cell at (row, column), empty string when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Pick the header row among the leading records.
///
/// Preamble records ("Data Source,...", "Last Updated Date,...") are short;
/// the header and every data row carry the full column set. The header is
/// therefore the first full-width row that still contains alphabetic text
/// (a year header like "1960" alone does not make a header row).
fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let probe = rows.len().min(10);
    let target_width = rows.iter().take(probe).map(Vec::len).max().unwrap_or(0);
    for (idx, row) in rows.iter().take(probe).enumerate() {
        if row.len() != target_width {
            continue;
        }
        let has_alpha = row
            .iter()
            .any(|cell| cell.chars().any(|ch| ch.is_ascii_alphabetic()));
        if has_alpha {
            return idx;
        }
    }
    0
}

/// Read a CSV file into a [`CsvTable`], skipping preamble and blank rows.
///
/// Rows after the header are padded with empty cells (or truncated) to the
/// header width, so every row indexes safely by header position.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(CsvTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    }

    let header_index = detect_header_row(&raw_rows);
    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| normalize_header(value))
        .collect();

    let mut rows = Vec::with_capacity(raw_rows.len().saturating_sub(header_index + 1));
    for record in raw_rows.iter().skip(header_index + 1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(value.to_string());
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}
