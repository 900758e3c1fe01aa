//! Run status ledger: one row per source, the single source of truth for
//! what succeeded in a run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use flatbed_ingest::{StageLayout, write_table};
use flatbed_model::{ModelError, RunStatus, Table};

const STATUS_COLUMNS: [&str; 5] = [
    "source_id",
    "source_label",
    "outcome",
    "message",
    "updated_at",
];

/// Render the ledger as a table with a uniform timestamp.
pub fn status_table(status: &RunStatus, updated_at: DateTime<Utc>) -> Result<Table, ModelError> {
    let mut table = Table::new(STATUS_COLUMNS.iter().map(|name| (*name).to_string()).collect())?;
    let stamp = updated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    for (source_id, entry) in status.iter() {
        table.push_row(vec![
            Value::String(source_id.to_string()),
            Value::String(entry.label.clone()),
            Value::String(entry.outcome.to_string()),
            if entry.message.is_empty() {
                Value::Null
            } else {
                Value::String(entry.message.clone())
            },
            Value::String(stamp.clone()),
        ])?;
    }
    Ok(table)
}

/// Write the ledger with an explicit timestamp; tests pin the timestamp
/// through this entry point.
pub fn write_status_ledger_at(
    layout: &StageLayout,
    status: &RunStatus,
    updated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = layout.status_ledger();
    let table = status_table(status, updated_at).context("build status table")?;
    write_table(&path, &table).with_context(|| format!("write {}", path.display()))?;
    info!(
        path = %path.display(),
        sources = status.len(),
        failures = status.failure_count(),
        "status ledger written"
    );
    Ok(path)
}

pub fn write_status_ledger(layout: &StageLayout, status: &RunStatus) -> Result<PathBuf> {
    write_status_ledger_at(layout, status, Utc::now())
}
