use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use hnp_ingest::read_csv_table;
use hnp_model::{IndicatorCatalog, RAW_INDICATOR_CODE, RAW_INDICATOR_NAME};
use hnp_transform::LifeSourceColumns;

use crate::cli::{IndicatorsArgs, InspectArgs, TidyArgs};
use crate::pipeline;
use crate::summary::apply_table_style;
use crate::types::{StageSummary, TidyResult};

/// Run the full reshape-and-merge pipeline.
pub fn run_tidy(args: &TidyArgs) -> Result<TidyResult> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let span = info_span!("tidy");
    let _guard = span.enter();

    let health_raw = pipeline::ingest(&args.health_csv, "health")?;
    let life_raw = pipeline::ingest(&args.life_csv, "life")?;

    let reshaped = pipeline::reshape(&health_raw, &catalog)?;

    let source_columns = match &args.life_metric_column {
        Some(name) => LifeSourceColumns {
            metric: name.clone(),
            ..Default::default()
        },
        None => LifeSourceColumns::default(),
    };
    let normalized = pipeline::normalize(&life_raw, &source_columns)?;

    let merged = pipeline::merge(&reshaped.data, &normalized.data)?;

    let output = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.health_csv));
        pipeline::output(&merged.data, &path)?;
        Some(path)
    };

    Ok(TidyResult {
        output,
        merged_rows: merged.merged_rows,
        stages: vec![
            StageSummary {
                stage: "health reshape",
                input_rows: reshaped.input_rows,
                output_rows: reshaped.data.height(),
                dropped_rows: reshaped.dropped_values,
            },
            StageSummary {
                stage: "life normalize",
                input_rows: normalized.input_rows,
                output_rows: normalized.data.height(),
                dropped_rows: normalized.dropped_rows + normalized.duplicate_rows,
            },
            StageSummary {
                stage: "merge",
                input_rows: merged.health_rows,
                output_rows: merged.merged_rows,
                dropped_rows: merged.health_rows - merged.merged_rows,
            },
        ],
    })
}

/// Print the active indicator catalog.
pub fn run_indicators(args: &IndicatorsArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["Indicator Code", "Tidy Column"]);
    apply_table_style(&mut table);
    for (code, name) in catalog.iter() {
        table.add_row(vec![code, name]);
    }
    println!("{table}");
    Ok(())
}

/// Print a source file's detected header row and, when the indicator
/// columns exist, the unique indicator names/codes it carries.
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let table = read_csv_table(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    println!("File: {}", args.file.display());
    println!("Rows: {}", table.rows.len());
    println!("Header ({} columns):", table.headers.len());
    for header in &table.headers {
        println!("  {header}");
    }
    for column in [RAW_INDICATOR_NAME, RAW_INDICATOR_CODE] {
        let Some(idx) = table.column_index(column) else {
            continue;
        };
        let unique: BTreeSet<&str> = table
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect();
        println!("Unique {column} values ({}):", unique.len());
        for value in unique {
            println!("  {value}");
        }
    }
    Ok(())
}

fn default_output_path(health_csv: &Path) -> PathBuf {
    health_csv.with_file_name("tidy.csv")
}

fn load_catalog(path: Option<&Path>) -> Result<IndicatorCatalog> {
    match path {
        Some(path) => {
            let catalog = IndicatorCatalog::from_json_file(path)
                .with_context(|| format!("load catalog {}", path.display()))?;
            Ok(catalog)
        }
        None => Ok(IndicatorCatalog::default()),
    }
}
