//! Inner join of the cleaned health and life tables on the composite
//! (country_code, year) key.
//!
//! The join walks health rows against a life-side lookup map and collects
//! survivors into a `BTreeMap` keyed by (country_code, year): membership
//! gives the inner-join semantics, first-wins insertion is the dedup
//! guard, and key-ordered iteration yields the ascending sort in one pass.

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use hnp_model::{COUNTRY_CODE, COUNTRY_NAME, LIFE_EXPECTANCY, TidyError, YEAR};

use crate::data_utils::{column_value_f64, column_value_i64, column_value_string};

/// Merge output plus the counters the driver reports.
#[derive(Debug)]
pub struct Merge {
    /// Unique per (country_code, year), sorted ascending by that key.
    pub data: DataFrame,
    pub health_rows: usize,
    pub life_rows: usize,
    pub merged_rows: usize,
    /// Health rows discarded because their key was already merged.
    pub duplicate_keys: usize,
}

struct MergedRow {
    country_name: String,
    indicators: Vec<Option<f64>>,
    life_expectancy: f64,
}

/// Inner-join the cleaned frames. The life table's country name is dropped
/// before the join; the health table's name is authoritative. An empty
/// result aborts with [`TidyError::EmptyMerge`].
pub fn merge_frames(health: &DataFrame, life: &DataFrame) -> Result<Merge> {
    // Life lookup keyed by (country_code, year); first value wins.
    let mut life_lookup: BTreeMap<(String, i64), f64> = BTreeMap::new();
    for idx in 0..life.height() {
        let code = column_value_string(life, COUNTRY_CODE, idx).trim().to_string();
        if code.is_empty() {
            continue;
        }
        let Some(year) = column_value_i64(life, YEAR, idx) else {
            continue;
        };
        let Some(value) = column_value_f64(life, LIFE_EXPECTANCY, idx) else {
            continue;
        };
        life_lookup.entry((code, year)).or_insert(value);
    }

    // Everything in the health frame beyond the key columns joins as-is.
    let indicator_columns: Vec<String> = health
        .get_column_names()
        .iter()
        .map(ToString::to_string)
        .filter(|name| name != COUNTRY_NAME && name != COUNTRY_CODE && name != YEAR)
        .collect();

    let mut merged: BTreeMap<(String, i64), MergedRow> = BTreeMap::new();
    let mut duplicate_keys = 0usize;
    for idx in 0..health.height() {
        let code = column_value_string(health, COUNTRY_CODE, idx).trim().to_string();
        let Some(year) = column_value_i64(health, YEAR, idx) else {
            continue;
        };
        let key = (code, year);
        let Some(&life_expectancy) = life_lookup.get(&key) else {
            continue;
        };
        if merged.contains_key(&key) {
            duplicate_keys += 1;
            continue;
        }
        let indicators = indicator_columns
            .iter()
            .map(|name| column_value_f64(health, name, idx))
            .collect();
        merged.insert(
            key,
            MergedRow {
                country_name: column_value_string(health, COUNTRY_NAME, idx),
                indicators,
                life_expectancy,
            },
        );
    }

    if merged.is_empty() {
        return Err(TidyError::EmptyMerge.into());
    }
    debug!(
        health_rows = health.height(),
        life_rows = life.height(),
        merged_rows = merged.len(),
        duplicate_keys,
        "merge complete"
    );

    let mut names: Vec<String> = Vec::with_capacity(merged.len());
    let mut codes: Vec<String> = Vec::with_capacity(merged.len());
    let mut years: Vec<i64> = Vec::with_capacity(merged.len());
    let mut indicators: Vec<Vec<Option<f64>>> =
        indicator_columns.iter().map(|_| Vec::with_capacity(merged.len())).collect();
    let mut life_values: Vec<f64> = Vec::with_capacity(merged.len());
    for ((code, year), row) in &merged {
        names.push(row.country_name.clone());
        codes.push(code.clone());
        years.push(*year);
        for (slot, value) in row.indicators.iter().enumerate() {
            indicators[slot].push(*value);
        }
        life_values.push(row.life_expectancy);
    }

    let mut columns = Vec::with_capacity(4 + indicator_columns.len());
    columns.push(Series::new(COUNTRY_NAME.into(), names).into());
    columns.push(Series::new(COUNTRY_CODE.into(), codes).into());
    columns.push(Series::new(YEAR.into(), years).into());
    for (slot, name) in indicator_columns.iter().enumerate() {
        columns.push(Series::new(name.as_str().into(), std::mem::take(&mut indicators[slot])).into());
    }
    columns.push(Series::new(LIFE_EXPECTANCY.into(), life_values).into());

    let merged_rows = merged.len();
    let data = DataFrame::new(columns)?;
    Ok(Merge {
        data,
        health_rows: health.height(),
        life_rows: life.height(),
        merged_rows,
        duplicate_keys,
    })
}
