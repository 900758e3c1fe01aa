use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use flatbed_model::SourceOutcome;

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Data root: {}", result.data_root.display());
    if let Some(path) = &result.status_ledger {
        println!("Status ledger: {}", path.display());
    }

    if !result.datasets.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Dataset"),
            header_cell("Sources"),
            header_cell("Rows"),
            header_cell("Report"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Center);
        for summary in &result.datasets {
            table.add_row(vec![
                Cell::new(&summary.name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(summary.sources_ok),
                Cell::new(summary.report_rows),
                report_cell(summary.report_path.as_deref()),
            ]);
        }
        println!("{table}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Label"),
        header_cell("Outcome"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for (source_id, entry) in result.status.iter() {
        table.add_row(vec![
            Cell::new(source_id),
            Cell::new(&entry.label),
            outcome_cell(entry.outcome),
            message_cell(&entry.message),
        ]);
    }
    println!();
    println!("Sources:");
    println!("{table}");

    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn outcome_cell(outcome: SourceOutcome) -> Cell {
    match outcome {
        SourceOutcome::Pending => Cell::new("pending").fg(Color::DarkGrey),
        SourceOutcome::Success => Cell::new("success").fg(Color::Green),
        SourceOutcome::Failed => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn report_cell(path: Option<&Path>) -> Cell {
    match path {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn message_cell(message: &str) -> Cell {
    if message.is_empty() {
        Cell::new("-").fg(Color::DarkGrey)
    } else {
        Cell::new(message)
    }
}
