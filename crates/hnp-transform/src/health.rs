//! Health indicator reshaper: wide (one column per year) to tidy (one row
//! per country-year, one column per catalog indicator).
//!
//! The reshape is two explicit passes rather than a generic reshape
//! primitive. The melt produces an ordered `Vec<LongRecord>` (raw row
//! order x year-column order); the pivot folds that sequence into a
//! `BTreeMap` keyed by (country_code, year). Because the melt order is
//! fixed, the first-wins collision policy is deterministic across runs.

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, warn};

use hnp_ingest::{CsvTable, parse_f64};
use hnp_model::{
    IndicatorCatalog, RAW_COUNTRY_CODE, RAW_COUNTRY_NAME, RAW_INDICATOR_CODE, year_column,
};
use hnp_model::{COUNTRY_CODE, COUNTRY_NAME, YEAR};

/// One melted observation: a single indicator value for a country-year.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub country_name: String,
    pub country_code: String,
    pub indicator_code: String,
    pub year: i64,
    pub value: f64,
}

/// Reshape output plus the counters the driver reports.
#[derive(Debug)]
pub struct HealthReshape {
    /// One row per (country_code, year), sorted by that key.
    pub data: DataFrame,
    pub input_rows: usize,
    /// Rows whose indicator code is a catalog key.
    pub matched_rows: usize,
    /// Year columns detected in the header.
    pub year_columns: usize,
    /// Long records that survived value coercion.
    pub melted_rows: usize,
    /// Melt cells dropped because the value was missing or non-numeric.
    pub dropped_values: usize,
    /// Pivot key collisions resolved first-wins.
    pub pivot_collisions: usize,
}

struct PivotGroup {
    country_name: String,
    values: BTreeMap<String, f64>,
}

/// Reshape the wide health table into the tidy per-country-year frame.
///
/// A table missing one of the fixed raw columns reshapes to an empty frame
/// rather than an error; the merger surfaces the resulting failure.
pub fn reshape_health(table: &CsvTable, catalog: &IndicatorCatalog) -> Result<HealthReshape> {
    let input_rows = table.rows.len();

    let year_cols: Vec<(usize, i64)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| year_column(header).map(|year| (idx, year)))
        .collect();

    let located = (
        table.column_index(RAW_COUNTRY_NAME),
        table.column_index(RAW_COUNTRY_CODE),
        table.column_index(RAW_INDICATOR_CODE),
    );
    let (Some(name_idx), Some(code_idx), Some(indicator_idx)) = located else {
        warn!(
            "health table is missing one of {RAW_COUNTRY_NAME:?}/{RAW_COUNTRY_CODE:?}/{RAW_INDICATOR_CODE:?}; reshape yields an empty table"
        );
        return Ok(HealthReshape {
            data: build_health_frame(catalog, &BTreeMap::new())?,
            input_rows,
            matched_rows: 0,
            year_columns: year_cols.len(),
            melted_rows: 0,
            dropped_values: 0,
            pivot_collisions: 0,
        });
    };

    // Melt: filtered wide rows -> ordered long records.
    let mut records: Vec<LongRecord> = Vec::new();
    let mut matched_rows = 0usize;
    let mut dropped_values = 0usize;
    for row in &table.rows {
        let indicator_code = row.get(indicator_idx).map(String::as_str).unwrap_or("");
        if !catalog.contains(indicator_code) {
            continue;
        }
        matched_rows += 1;
        let country_name = row.get(name_idx).map(String::as_str).unwrap_or("").trim();
        let country_code = row.get(code_idx).map(String::as_str).unwrap_or("").trim();
        for &(col, year) in &year_cols {
            let raw = row.get(col).map(String::as_str).unwrap_or("");
            match parse_f64(raw) {
                Some(value) => records.push(LongRecord {
                    country_name: country_name.to_string(),
                    country_code: country_code.to_string(),
                    indicator_code: indicator_code.trim().to_string(),
                    year,
                    value,
                }),
                None => dropped_values += 1,
            }
        }
    }
    debug!(
        matched_rows,
        melted_rows = records.len(),
        dropped_values,
        "health melt complete"
    );

    // Pivot: group by (country_code, year), first value wins per indicator.
    let mut groups: BTreeMap<(String, i64), PivotGroup> = BTreeMap::new();
    let mut pivot_collisions = 0usize;
    for record in &records {
        let Some(semantic) = catalog.semantic_name(&record.indicator_code) else {
            continue;
        };
        let group = groups
            .entry((record.country_code.clone(), record.year))
            .or_insert_with(|| PivotGroup {
                country_name: record.country_name.clone(),
                values: BTreeMap::new(),
            });
        if group.values.contains_key(semantic) {
            pivot_collisions += 1;
            continue;
        }
        group.values.insert(semantic.to_string(), record.value);
    }
    if pivot_collisions > 0 {
        debug!(pivot_collisions, "duplicate pivot keys resolved first-wins");
    }

    let data = build_health_frame(catalog, &groups)?;
    Ok(HealthReshape {
        data,
        input_rows,
        matched_rows,
        year_columns: year_cols.len(),
        melted_rows: records.len(),
        dropped_values,
        pivot_collisions,
    })
}

fn build_health_frame(
    catalog: &IndicatorCatalog,
    groups: &BTreeMap<(String, i64), PivotGroup>,
) -> Result<DataFrame> {
    let semantic_names = catalog.semantic_names();
    let mut names: Vec<String> = Vec::with_capacity(groups.len());
    let mut codes: Vec<String> = Vec::with_capacity(groups.len());
    let mut years: Vec<i64> = Vec::with_capacity(groups.len());
    let mut indicators: Vec<Vec<Option<f64>>> =
        semantic_names.iter().map(|_| Vec::with_capacity(groups.len())).collect();

    for ((code, year), group) in groups {
        names.push(group.country_name.clone());
        codes.push(code.clone());
        years.push(*year);
        for (slot, semantic) in semantic_names.iter().enumerate() {
            indicators[slot].push(group.values.get(*semantic).copied());
        }
    }

    let mut columns = Vec::with_capacity(3 + semantic_names.len());
    columns.push(Series::new(COUNTRY_NAME.into(), names).into());
    columns.push(Series::new(COUNTRY_CODE.into(), codes).into());
    columns.push(Series::new(YEAR.into(), years).into());
    for (slot, semantic) in semantic_names.iter().enumerate() {
        columns.push(Series::new((*semantic).into(), std::mem::take(&mut indicators[slot])).into());
    }
    DataFrame::new(columns).map_err(Into::into)
}
