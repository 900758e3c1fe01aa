use std::collections::BTreeSet;

use serde_json::Value;

use flatbed_model::{ModelError, Table};

/// Concatenate per-source tables into one reporting table.
///
/// Sources may have been through independent expansion steps, so their
/// column sets are allowed to differ: the union is taken over the superset
/// of columns in first-seen order (table order, then column order), and a
/// row is null-filled for every column its source lacked. Mismatched
/// column sets are expected input, never an error.
pub fn outer_union(tables: &[Table]) -> Result<Table, ModelError> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for table in tables {
        for name in table.columns() {
            if seen.insert(name.clone()) {
                columns.push(name.clone());
            }
        }
    }

    let union_columns = columns.clone();
    let mut union = Table::new(columns)?;
    for table in tables {
        let slots: Vec<Option<usize>> = union_columns
            .iter()
            .map(|name| table.column_index(name))
            .collect();
        for row in table.rows() {
            let cells: Vec<Value> = slots
                .iter()
                .map(|slot| match slot {
                    Some(index) => row[*index].clone(),
                    None => Value::Null,
                })
                .collect();
            union.push_row(cells)?;
        }
    }
    Ok(union)
}
