//! Tidy pipeline driver with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read both CSV files into string tables
//! 2. **Reshape**: filter/melt/pivot the health table
//! 3. **Normalize**: canonicalize and filter the life-expectancy table
//! 4. **Merge**: inner-join on (country_code, year)
//! 5. **Output**: write the merged table as CSV
//!
//! Each stage fully materializes its output before the next begins and
//! returns the transform counters untouched, so the summary never
//! re-derives a row count.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{debug, info, info_span};

use hnp_ingest::{CsvTable, read_csv_table};
use hnp_model::IndicatorCatalog;
use hnp_transform::{
    HealthReshape, LifeNormalize, LifeSourceColumns, Merge, merge_frames, normalize_life,
    reshape_health,
};

/// Read one source file into a string table.
pub fn ingest(path: &Path, label: &'static str) -> Result<CsvTable> {
    let span = info_span!("ingest", table = label);
    let _guard = span.enter();
    let start = Instant::now();
    let table = read_csv_table(path).with_context(|| format!("read {}", path.display()))?;
    debug!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "ingest complete"
    );
    Ok(table)
}

/// Reshape the wide health table into the tidy per-country-year frame.
pub fn reshape(table: &CsvTable, catalog: &IndicatorCatalog) -> Result<HealthReshape> {
    info_span!("reshape").in_scope(|| {
        let start = Instant::now();
        let result = reshape_health(table, catalog).context("reshape health table")?;
        info!(
            input_rows = result.input_rows,
            matched_rows = result.matched_rows,
            year_columns = result.year_columns,
            melted_rows = result.melted_rows,
            dropped_values = result.dropped_values,
            pivot_collisions = result.pivot_collisions,
            output_rows = result.data.height(),
            duration_ms = start.elapsed().as_millis() as u64,
            "health reshape complete"
        );
        Ok(result)
    })
}

/// Normalize the life-expectancy table to canonical columns.
pub fn normalize(table: &CsvTable, source: &LifeSourceColumns) -> Result<LifeNormalize> {
    info_span!("normalize").in_scope(|| {
        let start = Instant::now();
        let result = normalize_life(table, source).context("normalize life-expectancy table")?;
        info!(
            input_rows = result.input_rows,
            dropped_rows = result.dropped_rows,
            duplicate_rows = result.duplicate_rows,
            output_rows = result.data.height(),
            duration_ms = start.elapsed().as_millis() as u64,
            "life normalization complete"
        );
        Ok(result)
    })
}

/// Inner-join the cleaned frames on (country_code, year).
pub fn merge(health: &DataFrame, life: &DataFrame) -> Result<Merge> {
    info_span!("merge").in_scope(|| {
        let start = Instant::now();
        let result = merge_frames(health, life).context("merge cleaned tables")?;
        info!(
            health_rows = result.health_rows,
            life_rows = result.life_rows,
            merged_rows = result.merged_rows,
            duplicate_keys = result.duplicate_keys,
            duration_ms = start.elapsed().as_millis() as u64,
            "merge complete"
        );
        Ok(result)
    })
}

/// Write the merged table as CSV.
pub fn output(data: &DataFrame, path: &Path) -> Result<()> {
    info_span!("output").in_scope(|| {
        let mut frame = data.clone();
        let file =
            File::create(path).with_context(|| format!("create {}", path.display()))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut frame)
            .with_context(|| format!("write {}", path.display()))?;
        info!(rows = frame.height(), path = %path.display(), "merged table written");
        Ok(())
    })
}
