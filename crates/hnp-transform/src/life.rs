//! Life-expectancy normalizer: source-named columns to the canonical
//! schema, year-range filter, and order-preserving key dedup.

use std::collections::BTreeSet;

use anyhow::Result;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use hnp_ingest::{CsvTable, parse_f64, parse_i64};
use hnp_model::{COUNTRY_CODE, COUNTRY_NAME, LIFE_EXPECTANCY, TidyError, YEAR, YEAR_MAX, YEAR_MIN};

/// Source header names for the life-expectancy table. The defaults match
/// the Our World in Data export; the metric column varies by vintage and
/// is configurable from the CLI.
#[derive(Debug, Clone)]
pub struct LifeSourceColumns {
    /// Renamed to `country_name`.
    pub entity: String,
    /// Renamed to `country_code`.
    pub code: String,
    /// Renamed to `year`.
    pub year: String,
    /// Renamed to `life_expectancy`.
    pub metric: String,
}

impl Default for LifeSourceColumns {
    fn default() -> Self {
        Self {
            entity: "Entity".to_string(),
            code: "Code".to_string(),
            year: "Year".to_string(),
            metric: "Life expectancy".to_string(),
        }
    }
}

/// Normalizer output plus the counters the driver reports.
#[derive(Debug)]
pub struct LifeNormalize {
    /// Canonical columns, source row order, (country_code, year) unique.
    pub data: DataFrame,
    pub input_rows: usize,
    /// Rows dropped for a missing/unparseable year, out-of-range year,
    /// missing country code, or missing metric value.
    pub dropped_rows: usize,
    /// Rows dropped because their (country_code, year) key was already seen.
    pub duplicate_rows: usize,
}

/// Normalize the raw life-expectancy table.
///
/// A missing source column is the pipeline's one explicit precondition
/// failure and aborts with [`TidyError::SchemaMismatch`].
pub fn normalize_life(table: &CsvTable, source: &LifeSourceColumns) -> Result<LifeNormalize> {
    let entity_idx = require_column(table, &source.entity)?;
    let code_idx = require_column(table, &source.code)?;
    let year_idx = require_column(table, &source.year)?;
    let metric_idx = require_column(table, &source.metric)?;

    let input_rows = table.rows.len();
    let mut names: Vec<String> = Vec::with_capacity(input_rows);
    let mut codes: Vec<String> = Vec::with_capacity(input_rows);
    let mut years: Vec<i64> = Vec::with_capacity(input_rows);
    let mut values: Vec<f64> = Vec::with_capacity(input_rows);

    let mut seen: BTreeSet<(String, i64)> = BTreeSet::new();
    let mut dropped_rows = 0usize;
    let mut duplicate_rows = 0usize;

    for row in &table.rows {
        let Some(year) = row.get(year_idx).and_then(|cell| parse_i64(cell)) else {
            dropped_rows += 1;
            continue;
        };
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            dropped_rows += 1;
            continue;
        }
        let code = row.get(code_idx).map(String::as_str).unwrap_or("").trim();
        if code.is_empty() {
            dropped_rows += 1;
            continue;
        }
        let Some(value) = row.get(metric_idx).and_then(|cell| parse_f64(cell)) else {
            dropped_rows += 1;
            continue;
        };
        if !seen.insert((code.to_string(), year)) {
            duplicate_rows += 1;
            continue;
        }
        names.push(row.get(entity_idx).map(String::as_str).unwrap_or("").trim().to_string());
        codes.push(code.to_string());
        years.push(year);
        values.push(value);
    }

    debug!(
        input_rows,
        kept_rows = codes.len(),
        dropped_rows,
        duplicate_rows,
        "life normalization complete"
    );

    let columns = vec![
        Series::new(COUNTRY_NAME.into(), names).into(),
        Series::new(COUNTRY_CODE.into(), codes).into(),
        Series::new(YEAR.into(), years).into(),
        Series::new(LIFE_EXPECTANCY.into(), values).into(),
    ];
    let data = DataFrame::new(columns)?;
    Ok(LifeNormalize {
        data,
        input_rows,
        dropped_rows,
        duplicate_rows,
    })
}

fn require_column(table: &CsvTable, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| {
        TidyError::SchemaMismatch {
            table: "life-expectancy".to_string(),
            column: name.to_string(),
        }
        .into()
    })
}
