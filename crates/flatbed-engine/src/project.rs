use serde_json::Value;

use flatbed_model::{AttributeBag, Table};

use crate::error::Result;

/// Project one attribute bag onto a fixed attribute list. Absent fields
/// become null; present values are copied verbatim, nested or not —
/// flattening happens in later steps. Source records vary in shape by
/// object kind and version, so this is the only place that looks at the
/// bag directly.
pub fn project_record(bag: &AttributeBag, attributes: &[String]) -> Vec<Value> {
    attributes
        .iter()
        .map(|name| bag.get(name).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Project a batch of bags into a table whose columns are exactly the
/// attribute list. Fails only if the attribute list itself repeats a name.
pub fn project_records(bags: &[AttributeBag], attributes: &[String]) -> Result<Table> {
    let mut table = Table::new(attributes.to_vec())?;
    for bag in bags {
        table.push_row(project_record(bag, attributes))?;
    }
    Ok(table)
}
