use std::collections::BTreeMap;

use serde_json::{Map, Value};

use flatbed_model::{Table, cell_to_string};

use crate::error::{EngineError, Result};

/// Flatten a mapping-valued column into one derived column per observed
/// key, named `{prefix}{key}` unless the key already carries the prefix
/// (so repeated application never doubles it). Cells may hold the mapping
/// itself or its JSON text encoding; either way the values are coerced to
/// text for uniform CSV output, null cells contributing null to every
/// derived column. Derived columns follow the original columns in
/// first-seen key order.
///
/// Two distinct keys deriving the same column name is an
/// `AmbiguousFlattening` error; a derived name shadowing a surviving
/// original column is reported by table construction as a duplicate. No
/// collision is ever resolved by overwriting.
pub fn flatten_map(table: &Table, column: &str, prefix: &str) -> Result<Table> {
    let index = table
        .column_index(column)
        .ok_or_else(|| EngineError::MissingExpansionColumn {
            column: column.to_string(),
        })?;

    // Decode every cell up front so the naming pass and the data pass agree.
    let mut decoded: Vec<Option<Map<String, Value>>> = Vec::with_capacity(table.height());
    for (row, cells) in table.rows().iter().enumerate() {
        decoded.push(decode_map_cell(&cells[index], column, row)?);
    }

    let mut derived: Vec<String> = Vec::new();
    let mut origin: BTreeMap<String, String> = BTreeMap::new();
    for mapping in decoded.iter().flatten() {
        for key in mapping.keys() {
            let name = derived_name(key, prefix);
            match origin.get(&name) {
                None => {
                    origin.insert(name.clone(), key.clone());
                    derived.push(name);
                }
                Some(first) if first != key => {
                    return Err(EngineError::AmbiguousFlattening {
                        column: column.to_string(),
                        derived: name,
                        first: first.clone(),
                        second: key.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    let mut columns: Vec<String> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, name)| name.clone())
        .collect();
    columns.extend(derived.iter().cloned());
    let mut flattened = Table::new(columns)?;

    for (cells, mapping) in table.rows().iter().zip(&decoded) {
        let mut row: Vec<Value> = cells
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, cell)| cell.clone())
            .collect();
        for name in &derived {
            let key = &origin[name];
            let value = mapping.as_ref().and_then(|entries| entries.get(key.as_str()));
            row.push(stringify_map_value(value));
        }
        flattened.push_row(row)?;
    }
    Ok(flattened)
}

fn derived_name(key: &str, prefix: &str) -> String {
    if key.starts_with(prefix) {
        key.to_string()
    } else {
        format!("{prefix}{key}")
    }
}

/// JSON is the canonical text encoding for mapping cells; anything else in
/// a mapping column is a data defect surfaced to the caller.
fn decode_map_cell(
    value: &Value,
    column: &str,
    row: usize,
) -> Result<Option<Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(mapping) => Ok(Some(mapping.clone())),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(mapping)) => Ok(Some(mapping)),
            _ => Err(EngineError::InvalidMapCell {
                column: column.to_string(),
                row,
            }),
        },
        _ => Err(EngineError::InvalidMapCell {
            column: column.to_string(),
            row,
        }),
    }
}

fn stringify_map_value(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(text)) => Value::String(text.clone()),
        Some(other) => Value::String(cell_to_string(other).unwrap_or_default()),
    }
}
