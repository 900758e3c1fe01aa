//! Per-dataset processing pipeline with explicit stages.
//!
//! The pipeline runs these stages in order, per source:
//! 1. **Acquire**: fetch attribute bags, project onto the attribute list,
//!    apply expansion steps, write the raw stage.
//! 2. **Transform**: read the raw stage, apply the rename schema, write the
//!    cleaned stage and its change ledger.
//!
//! and then once per dataset across all sources:
//! 3. **Union**: outer-union the cleaned stages into the reporting table.
//!
//! A failure in any dataset is confined to that dataset and folded into the
//! per-source run status; the remaining datasets and sources continue.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use flatbed_engine::{apply_expand_step, normalize_schema, project_records, tidy_timestamps};
use flatbed_ingest::{SourceConnector, StageLayout, read_table, write_table};
use flatbed_model::DatasetDescriptor;
use flatbed_report::write_union_report;

use crate::types::DatasetSummary;

/// One dataset successfully staged for one source.
#[derive(Debug)]
pub struct DatasetRun {
    pub dataset: String,
    pub raw_rows: usize,
    pub cleaned_rows: usize,
}

/// One dataset that failed for one source, with the rendered cause.
#[derive(Debug)]
pub struct DatasetFailure {
    pub dataset: String,
    pub reason: String,
}

/// Outcome of processing every dataset of a single source.
#[derive(Debug)]
pub struct SourceRun {
    pub source_id: String,
    pub completed: Vec<DatasetRun>,
    pub failures: Vec<DatasetFailure>,
}

impl SourceRun {
    pub fn succeeded(&self, dataset: &str) -> bool {
        self.completed.iter().any(|run| run.dataset == dataset)
    }
}

/// Outcome of the union stage across all sources.
#[derive(Debug)]
pub struct UnionOutcome {
    pub summaries: Vec<DatasetSummary>,
    pub errors: Vec<String>,
}

/// Fetch, project, expand, and stage one dataset for one source. Returns
/// the raw-stage row count.
pub fn acquire_dataset(
    connector: &dyn SourceConnector,
    layout: &StageLayout,
    source_id: &str,
    descriptor: &DatasetDescriptor,
) -> Result<usize> {
    let bags = connector
        .fetch(&descriptor.name)
        .context("fetch records")?;
    let mut table =
        project_records(&bags, &descriptor.attributes).context("project records")?;

    for step in &descriptor.expand {
        match apply_expand_step(&table, step) {
            Ok(expanded) => table = expanded,
            Err(error) if error.is_missing_column() => {
                // Nothing to expand for this export; the step is skipped,
                // not the dataset.
                debug!(
                    source_id,
                    dataset = %descriptor.name,
                    column = step.column(),
                    "expansion column absent, skipping step"
                );
            }
            Err(error) => {
                return Err(anyhow::Error::new(error))
                    .with_context(|| format!("expand column {}", step.column()));
            }
        }
    }

    for column in &descriptor.tidy_timestamps {
        match tidy_timestamps(&table, column) {
            Ok(tidied) => table = tidied,
            Err(error) if error.is_missing_column() => {
                debug!(
                    source_id,
                    dataset = %descriptor.name,
                    column = column.as_str(),
                    "timestamp column absent, skipping"
                );
            }
            Err(error) => {
                return Err(anyhow::Error::new(error))
                    .with_context(|| format!("tidy column {column}"));
            }
        }
    }

    let path = layout.raw_table(source_id, &descriptor.name);
    write_table(&path, &table).with_context(|| format!("write raw stage {}", path.display()))?;
    Ok(table.height())
}

/// Normalize one dataset's raw stage into its cleaned stage, writing the
/// change ledger alongside. Returns the cleaned row count.
pub fn transform_dataset(
    layout: &StageLayout,
    source_id: &str,
    descriptor: &DatasetDescriptor,
) -> Result<usize> {
    let raw_path = layout.raw_table(source_id, &descriptor.name);
    let raw =
        read_table(&raw_path).with_context(|| format!("read raw stage {}", raw_path.display()))?;

    let normalized = normalize_schema(&raw, &descriptor.rename, descriptor.drop_unlisted)
        .context("normalize schema")?;

    let cleaned_path = layout.cleaned_table(source_id, &descriptor.name);
    write_table(&cleaned_path, &normalized.table)
        .with_context(|| format!("write cleaned stage {}", cleaned_path.display()))?;

    let ledger_path = layout.change_ledger(source_id, &descriptor.name);
    let ledger_table = normalized.ledger.to_table().context("render change ledger")?;
    write_table(&ledger_path, &ledger_table)
        .with_context(|| format!("write change ledger {}", ledger_path.display()))?;

    debug!(
        source_id,
        dataset = %descriptor.name,
        renamed = normalized.ledger.renamed_count(),
        deleted = normalized.ledger.deleted_count(),
        rows = normalized.table.height(),
        "dataset normalized"
    );
    Ok(normalized.table.height())
}

/// Run acquire and transform for every dataset of one source. Failures are
/// collected, never propagated: one broken dataset must not stop the rest.
pub fn process_source(
    connector: &dyn SourceConnector,
    layout: &StageLayout,
    source_id: &str,
    datasets: &[DatasetDescriptor],
) -> SourceRun {
    let source_span = info_span!("source", source_id = %source_id);
    let _source_guard = source_span.enter();
    let source_start = Instant::now();

    let mut run = SourceRun {
        source_id: source_id.to_string(),
        completed: Vec::new(),
        failures: Vec::new(),
    };

    for descriptor in datasets {
        let dataset_span = info_span!("dataset", source_id = %source_id, dataset = %descriptor.name);
        let _dataset_guard = dataset_span.enter();

        let staged = acquire_dataset(connector, layout, source_id, descriptor).and_then(
            |raw_rows| {
                let cleaned_rows = transform_dataset(layout, source_id, descriptor)?;
                Ok((raw_rows, cleaned_rows))
            },
        );

        match staged {
            Ok((raw_rows, cleaned_rows)) => {
                debug!(raw_rows, cleaned_rows, "dataset staged");
                run.completed.push(DatasetRun {
                    dataset: descriptor.name.clone(),
                    raw_rows,
                    cleaned_rows,
                });
            }
            Err(error) => {
                let reason = format!("{error:#}");
                warn!(reason = %reason, "dataset failed");
                run.failures.push(DatasetFailure {
                    dataset: descriptor.name.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        datasets = run.completed.len(),
        failures = run.failures.len(),
        duration_ms = source_start.elapsed().as_millis(),
        "source processed"
    );
    run
}

/// Union the cleaned stages of every dataset across all sources. Read or
/// write problems for one dataset are recorded and the rest continue.
pub fn union_stage(
    layout: &StageLayout,
    datasets: &[DatasetDescriptor],
    runs: &[SourceRun],
) -> UnionOutcome {
    let mut summaries = Vec::new();
    let mut errors = Vec::new();

    for descriptor in datasets {
        let union_span = info_span!("union", dataset = %descriptor.name);
        let _union_guard = union_span.enter();

        let mut tables = Vec::new();
        let mut sources_ok = 0usize;
        for run in runs {
            if !run.succeeded(&descriptor.name) {
                continue;
            }
            let path = layout.cleaned_table(&run.source_id, &descriptor.name);
            match read_table(&path) {
                Ok(table) => {
                    tables.push(table);
                    sources_ok += 1;
                }
                Err(error) => errors.push(format!("{}: {error}", path.display())),
            }
        }

        if tables.is_empty() {
            debug!(dataset = %descriptor.name, "no cleaned tables to union");
            summaries.push(DatasetSummary {
                name: descriptor.name.clone(),
                sources_ok: 0,
                report_rows: 0,
                report_path: None,
            });
            continue;
        }

        match write_union_report(layout, &descriptor.name, &tables) {
            Ok((path, rows)) => summaries.push(DatasetSummary {
                name: descriptor.name.clone(),
                sources_ok,
                report_rows: rows,
                report_path: Some(path),
            }),
            Err(error) => {
                errors.push(format!("{}: {error:#}", descriptor.name));
                summaries.push(DatasetSummary {
                    name: descriptor.name.clone(),
                    sources_ok,
                    report_rows: 0,
                    report_path: None,
                });
            }
        }
    }

    UnionOutcome { summaries, errors }
}
