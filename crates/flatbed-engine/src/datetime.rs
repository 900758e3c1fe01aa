use serde_json::Value;

use flatbed_model::Table;

use crate::error::{EngineError, Result};

/// Rewrite an ISO-8601 timestamp into the `YYYY-MM-DD HH:MM:SS` form the
/// reporting tools expect: the date/time separator becomes a space and a
/// trailing Zulu marker is dropped. Anything else passes through untouched.
pub fn tidy_timestamp(text: &str) -> String {
    let spaced = text.replacen('T', " ", 1);
    spaced
        .strip_suffix('Z')
        .map(str::to_string)
        .unwrap_or(spaced)
}

/// Apply [`tidy_timestamp`] to every text cell of one column. Missing
/// column reports `MissingExpansionColumn`, which callers treat as a skip.
pub fn tidy_timestamps(table: &Table, column: &str) -> Result<Table> {
    let index = table
        .column_index(column)
        .ok_or_else(|| EngineError::MissingExpansionColumn {
            column: column.to_string(),
        })?;

    let mut tidied = Table::new(table.columns().to_vec())?;
    for row in table.rows() {
        let mut cells = row.clone();
        if let Value::String(text) = &cells[index] {
            cells[index] = Value::String(tidy_timestamp(text));
        }
        tidied.push_row(cells)?;
    }
    Ok(tidied)
}
