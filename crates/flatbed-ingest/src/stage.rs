//! CSV-backed stage store.
//!
//! Round-trip guarantee: column order is preserved exactly, and the null
//! marker maps to an empty field both ways (`Value::Null` writes as ""; an
//! empty field reads back as `Value::Null`). Cells read back as text —
//! stage files are the interchange format, not a typed store.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde_json::Value;
use tracing::debug;

use flatbed_model::{Table, cell_to_string};

use crate::error::{IngestError, Result};

pub fn read_table(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|source| IngestError::csv(path, source))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::csv(path, source))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut table = Table::new(headers).map_err(|source| IngestError::model(path, source))?;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::csv(path, source))?;
        let row: Vec<Value> = record.iter().map(cell_from_field).collect();
        table
            .push_row(row)
            .map_err(|source| IngestError::model(path, source))?;
    }
    debug!(path = %path.display(), rows = table.height(), "stage read");
    Ok(table)
}

pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|source| IngestError::csv(path, source))?;
    writer
        .write_record(table.columns())
        .map_err(|source| IngestError::csv(path, source))?;
    for row in table.rows() {
        let record: Vec<String> = row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect();
        writer
            .write_record(&record)
            .map_err(|source| IngestError::csv(path, source))?;
    }
    writer.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = table.height(), "stage written");
    Ok(())
}

fn cell_from_field(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::String(raw.to_string())
    }
}
