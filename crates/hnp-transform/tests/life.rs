//! Integration tests for the life-expectancy normalizer.

use hnp_ingest::CsvTable;
use hnp_model::TidyError;
use hnp_transform::data_utils::{column_value_f64, column_value_i64, column_value_string};
use hnp_transform::{LifeSourceColumns, normalize_life};

fn life_table(rows: Vec<Vec<&str>>) -> CsvTable {
    CsvTable {
        headers: vec![
            "Entity".to_string(),
            "Code".to_string(),
            "Year".to_string(),
            "Life expectancy".to_string(),
        ],
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect(),
    }
}

#[test]
fn renames_source_columns_to_canonical_names() {
    let table = life_table(vec![vec!["Testland", "TST", "2010", "71.5"]]);
    let result = normalize_life(&table, &LifeSourceColumns::default()).unwrap();

    let names: Vec<String> = result
        .data
        .get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["country_name", "country_code", "year", "life_expectancy"]);
    assert_eq!(column_value_string(&result.data, "country_name", 0), "Testland");
    assert_eq!(column_value_string(&result.data, "country_code", 0), "TST");
    assert_eq!(column_value_i64(&result.data, "year", 0), Some(2010));
    assert_eq!(column_value_f64(&result.data, "life_expectancy", 0), Some(71.5));
}

#[test]
fn missing_source_column_is_a_schema_error() {
    let table = CsvTable {
        headers: vec!["Entity".to_string(), "Code".to_string(), "Year".to_string()],
        rows: vec![],
    };
    let error = normalize_life(&table, &LifeSourceColumns::default()).unwrap_err();
    match error.downcast_ref::<TidyError>() {
        Some(TidyError::SchemaMismatch { column, .. }) => {
            assert_eq!(column, "Life expectancy");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn out_of_range_years_are_dropped() {
    let table = life_table(vec![
        vec!["Testland", "TST", "1900", "60"],
        vec!["Testland", "TST", "1950", "61"],
        vec!["Testland", "TST", "2025", "82"],
        vec!["Testland", "TST", "2026", "83"],
    ]);
    let result = normalize_life(&table, &LifeSourceColumns::default()).unwrap();

    assert_eq!(result.data.height(), 2);
    assert_eq!(result.dropped_rows, 2);
    let years: Vec<Option<i64>> = (0..result.data.height())
        .map(|idx| column_value_i64(&result.data, "year", idx))
        .collect();
    assert_eq!(years, vec![Some(1950), Some(2025)]);
}

#[test]
fn incomplete_rows_are_dropped_and_counted() {
    let table = life_table(vec![
        vec!["Testland", "TST", "2010", "71.5"],
        vec!["Testland", "", "2011", "71.9"],
        vec!["Testland", "TST", "abc", "72.0"],
        vec!["Testland", "TST", "2012", ""],
    ]);
    let result = normalize_life(&table, &LifeSourceColumns::default()).unwrap();

    assert_eq!(result.data.height(), 1);
    assert_eq!(result.dropped_rows, 3);
}

#[test]
fn duplicate_keys_keep_the_first_row() {
    let table = life_table(vec![
        vec!["Testland", "TST", "2010", "71.5"],
        vec!["Testland", "TST", "2010", "99.9"],
    ]);
    let result = normalize_life(&table, &LifeSourceColumns::default()).unwrap();

    assert_eq!(result.data.height(), 1);
    assert_eq!(result.duplicate_rows, 1);
    assert_eq!(column_value_f64(&result.data, "life_expectancy", 0), Some(71.5));
}

#[test]
fn custom_metric_column_name_is_honored() {
    let table = CsvTable {
        headers: vec![
            "Entity".to_string(),
            "Code".to_string(),
            "Year".to_string(),
            "Life expectancy at birth (historical)".to_string(),
        ],
        rows: vec![vec![
            "Testland".to_string(),
            "TST".to_string(),
            "2010".to_string(),
            "71.5".to_string(),
        ]],
    };
    let source = LifeSourceColumns {
        metric: "Life expectancy at birth (historical)".to_string(),
        ..Default::default()
    };
    let result = normalize_life(&table, &source).unwrap();
    assert_eq!(column_value_f64(&result.data, "life_expectancy", 0), Some(71.5));
}
