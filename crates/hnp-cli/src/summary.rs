use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::types::TidyResult;

/// Print the per-stage row accounting and the output location.
pub fn print_summary(result: &TidyResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Dropped"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for stage in &result.stages {
        table.add_row(vec![
            Cell::new(stage.stage),
            Cell::new(stage.input_rows),
            Cell::new(stage.output_rows),
            Cell::new(stage.dropped_rows),
        ]);
    }
    println!("{table}");
    println!("Merged rows: {}", result.merged_rows);
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
