use serde_json::Value;

use flatbed_model::Table;

use crate::error::{EngineError, Result};

/// Expand a sequence-valued column into one row per element, every other
/// column copied across the replicated rows. Element order within a row
/// and original row order are both preserved.
///
/// A null or empty sequence yields zero rows for that source row — the row
/// is dropped on purpose: a module with no items contributes nothing to an
/// item-level table. A scalar cell is treated as a one-element sequence.
pub fn unroll_list(table: &Table, column: &str) -> Result<Table> {
    let index = table
        .column_index(column)
        .ok_or_else(|| EngineError::MissingExpansionColumn {
            column: column.to_string(),
        })?;

    let mut unrolled = Table::new(table.columns().to_vec())?;
    for row in table.rows() {
        match &row[index] {
            Value::Null => {}
            Value::Array(elements) => {
                for element in elements {
                    let mut expanded = row.clone();
                    expanded[index] = element.clone();
                    unrolled.push_row(expanded)?;
                }
            }
            _ => {
                unrolled.push_row(row.clone())?;
            }
        }
    }
    Ok(unrolled)
}
