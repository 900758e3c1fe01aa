use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use flatbed_ingest::{StageLayout, write_table};
use flatbed_model::Table;

use crate::union::outer_union;

/// Union the cleaned per-source tables of one dataset and write the
/// reporting table. Returns the path and unioned row count.
pub fn write_union_report(
    layout: &StageLayout,
    dataset: &str,
    tables: &[Table],
) -> Result<(PathBuf, usize)> {
    let union = outer_union(tables).with_context(|| format!("union {dataset} tables"))?;
    let path = layout.report_table(dataset);
    write_table(&path, &union).with_context(|| format!("write {}", path.display()))?;
    info!(
        dataset,
        sources = tables.len(),
        rows = union.height(),
        columns = union.width(),
        path = %path.display(),
        "reporting table written"
    );
    Ok((path, union.height()))
}
