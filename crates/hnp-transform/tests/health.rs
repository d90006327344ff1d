//! Integration tests for the health reshaper.

use hnp_ingest::CsvTable;
use hnp_model::IndicatorCatalog;
use hnp_transform::data_utils::{column_value_f64, column_value_i64, column_value_string};
use hnp_transform::reshape_health;

fn health_table(rows: Vec<Vec<&str>>) -> CsvTable {
    CsvTable {
        headers: vec![
            "Country Name".to_string(),
            "Country Code".to_string(),
            "Indicator Name".to_string(),
            "Indicator Code".to_string(),
            "1900".to_string(),
            "2009".to_string(),
            "2010".to_string(),
        ],
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect(),
    }
}

#[test]
fn catalog_codes_survive_and_others_are_excluded() {
    let table = health_table(vec![
        vec![
            "United States",
            "USA",
            "Health expenditure per capita",
            "SH.XPD.PCAP",
            "",
            "8500",
            "9000",
        ],
        vec!["United States", "USA", "Something else", "XYZ.999", "", "1", "2"],
    ]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    assert_eq!(result.matched_rows, 1);
    assert_eq!(result.data.height(), 2);
    let last = result.data.height() - 1;
    assert_eq!(column_value_string(&result.data, "country_code", last), "USA");
    assert_eq!(column_value_i64(&result.data, "year", last), Some(2010));
    assert_eq!(
        column_value_f64(&result.data, "health_exp_per_capita", last),
        Some(9000.0)
    );
    // The non-catalog indicator contributes no column.
    assert!(result.data.column("XYZ.999").is_err());
}

#[test]
fn year_columns_outside_range_do_not_melt() {
    let table = health_table(vec![vec![
        "United States",
        "USA",
        "Health expenditure per capita",
        "SH.XPD.PCAP",
        "123",
        "8500",
        "9000",
    ]]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    // "1900" is not a year column, so its value never becomes a record.
    assert_eq!(result.year_columns, 2);
    assert_eq!(result.melted_rows, 2);
    let years: Vec<Option<i64>> = (0..result.data.height())
        .map(|idx| column_value_i64(&result.data, "year", idx))
        .collect();
    assert_eq!(years, vec![Some(2009), Some(2010)]);
}

#[test]
fn missing_and_non_numeric_values_are_dropped_and_counted() {
    let table = health_table(vec![vec![
        "United States",
        "USA",
        "Health expenditure per capita",
        "SH.XPD.PCAP",
        "",
        "..",
        "9000",
    ]]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    assert_eq!(result.melted_rows, 1);
    assert_eq!(result.dropped_values, 1);
    assert_eq!(result.data.height(), 1);
    assert_eq!(
        column_value_f64(&result.data, "health_exp_per_capita", 0),
        Some(9000.0)
    );
}

#[test]
fn duplicate_indicator_rows_resolve_first_seen() {
    let table = health_table(vec![
        vec![
            "United States",
            "USA",
            "Health expenditure per capita",
            "SH.XPD.PCAP",
            "",
            "",
            "9000",
        ],
        vec![
            "United States",
            "USA",
            "Health expenditure per capita",
            "SH.XPD.PCAP",
            "",
            "",
            "1111",
        ],
    ]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    assert_eq!(result.pivot_collisions, 1);
    assert_eq!(result.data.height(), 1);
    assert_eq!(
        column_value_f64(&result.data, "health_exp_per_capita", 0),
        Some(9000.0)
    );
}

#[test]
fn indicators_missing_for_a_country_year_stay_null() {
    let table = health_table(vec![vec![
        "United States",
        "USA",
        "Health expenditure per capita",
        "SH.XPD.PCAP",
        "",
        "",
        "9000",
    ]]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    assert_eq!(column_value_f64(&result.data, "health_exp_total", 0), None);
    assert_eq!(column_value_f64(&result.data, "health_exp_pct_gdp", 0), None);
}

#[test]
fn key_is_unique_and_sorted_after_pivot() {
    let table = health_table(vec![
        vec!["Brazil", "BRA", "n", "SH.XPD.PCAP", "", "100", "200"],
        vec!["Argentina", "ARG", "n", "SH.XPD.PCAP", "", "300", "400"],
        vec!["Brazil", "BRA", "n", "SH.XPD.TOTL.ZS", "", "5", "6"],
    ]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();

    let keys: Vec<(String, i64)> = (0..result.data.height())
        .map(|idx| {
            (
                column_value_string(&result.data, "country_code", idx),
                column_value_i64(&result.data, "year", idx).unwrap(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys, sorted);
    assert_eq!(keys.len(), 4);
    // BRA 2009 carries both indicators on one row.
    let bra_2009 = keys.iter().position(|k| k == &("BRA".to_string(), 2009)).unwrap();
    assert_eq!(
        column_value_f64(&result.data, "health_exp_per_capita", bra_2009),
        Some(100.0)
    );
    assert_eq!(
        column_value_f64(&result.data, "health_exp_pct_gdp", bra_2009),
        Some(5.0)
    );
}

#[test]
fn indicator_columns_are_exactly_the_catalog_names() {
    let catalog = IndicatorCatalog::default();
    let table = health_table(vec![vec![
        "United States",
        "USA",
        "Health expenditure per capita",
        "SH.XPD.PCAP",
        "",
        "8500",
        "9000",
    ]]);
    let result = reshape_health(&table, &catalog).unwrap();

    let columns: Vec<String> = result
        .data
        .get_column_names()
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut expected = vec![
        "country_name".to_string(),
        "country_code".to_string(),
        "year".to_string(),
    ];
    expected.extend(catalog.semantic_names().iter().map(ToString::to_string));
    assert_eq!(columns, expected);
}

#[test]
fn missing_fixed_columns_reshape_to_empty_table() {
    let table = CsvTable {
        headers: vec!["Name".to_string(), "2010".to_string()],
        rows: vec![vec!["United States".to_string(), "9000".to_string()]],
    };
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();
    assert_eq!(result.data.height(), 0);
    assert_eq!(result.matched_rows, 0);
}

#[test]
fn empty_catalog_match_yields_empty_table_not_error() {
    let table = health_table(vec![vec![
        "United States",
        "USA",
        "Something else",
        "XYZ.999",
        "",
        "1",
        "2",
    ]]);
    let result = reshape_health(&table, &IndicatorCatalog::default()).unwrap();
    assert_eq!(result.data.height(), 0);
}
