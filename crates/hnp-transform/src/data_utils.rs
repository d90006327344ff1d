//! Row-level value accessors over polars frames.

use polars::prelude::{AnyValue, DataFrame};

use hnp_ingest::{any_to_f64, any_to_i64, any_to_string};

/// Get a string value from a DataFrame column at the given row index.
/// Missing column or null cell yields an empty string.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// Get an integer value from a DataFrame column at the given row index.
pub fn column_value_i64(df: &DataFrame, name: &str, idx: usize) -> Option<i64> {
    let column = df.column(name).ok()?;
    any_to_i64(column.get(idx).unwrap_or(AnyValue::Null))
}

/// Get a float value from a DataFrame column at the given row index.
pub fn column_value_f64(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    let column = df.column(name).ok()?;
    any_to_f64(column.get(idx).unwrap_or(AnyValue::Null))
}
