use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{debug, info, info_span};

use flatbed_ingest::{JsonDirConnector, StageLayout, discover_sources, load_pipeline_config};
use flatbed_model::{DatasetDescriptor, ExpandStep, PipelineConfig, RunStatus};
use flatbed_report::write_status_ledger;

use crate::cli::{DatasetsArgs, RunArgs};
use crate::pipeline::{UnionOutcome, process_source, union_stage};
use crate::summary::apply_table_style;
use crate::types::RunResult;

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let config = load_config(args.config.as_deref())?;
    if config.datasets.is_empty() {
        bail!("configuration lists no datasets");
    }

    let data_root = args
        .data_root
        .clone()
        .unwrap_or_else(|| args.input_root.join("data"));
    let layout = StageLayout::new(&data_root);
    let run_span = info_span!(
        "run",
        input_root = %args.input_root.display(),
        data_root = %data_root.display()
    );
    let _run_guard = run_span.enter();

    let sources = if args.sources.is_empty() {
        discover_sources(&args.input_root).context("discover sources")?
    } else {
        args.sources.clone()
    };
    if sources.is_empty() {
        bail!(
            "no source directories under {}",
            args.input_root.display()
        );
    }

    let mut status = RunStatus::default();
    for source_id in &sources {
        status.register(source_id, config.label_for(source_id));
    }

    if args.dry_run {
        info!(
            sources = sources.len(),
            datasets = config.datasets.len(),
            "dry run, nothing written"
        );
        return Ok(RunResult {
            data_root,
            report_dir: layout.report_dir(),
            status_ledger: None,
            datasets: Vec::new(),
            status,
            errors: Vec::new(),
            has_failures: false,
            all_sources_failed: false,
        });
    }

    // An unwritable report directory dooms the whole run, unlike any single
    // dataset, so it is checked before any work starts.
    fs::create_dir_all(layout.report_dir()).with_context(|| {
        format!(
            "create report directory {}",
            layout.report_dir().display()
        )
    })?;

    let mut runs = Vec::new();
    for source_id in &sources {
        let connector = JsonDirConnector::new(args.input_root.join(source_id));
        let run = process_source(&connector, &layout, source_id, &config.datasets);
        if run.failures.is_empty() {
            status.record_success(
                source_id,
                format!("{} datasets processed", run.completed.len()),
            );
        } else {
            let reasons: Vec<String> = run
                .failures
                .iter()
                .map(|failure| format!("{}: {}", failure.dataset, failure.reason))
                .collect();
            status.record_failure(source_id, reasons.join("; "));
        }
        runs.push(run);
    }

    let UnionOutcome {
        summaries,
        mut errors,
    } = union_stage(&layout, &config.datasets, &runs);

    let status_ledger = match write_status_ledger(&layout, &status) {
        Ok(path) => Some(path),
        Err(error) => {
            // The ledger is the run's source of truth; failing to write it
            // is an infrastructure failure.
            return Err(error).context("write status ledger");
        }
    };

    let all_sources_failed = status.all_failed();
    let has_failures = status.failure_count() > 0 || !errors.is_empty();
    if has_failures {
        errors.sort();
    }

    Ok(RunResult {
        data_root,
        report_dir: layout.report_dir(),
        status_ledger,
        datasets: summaries,
        status,
        errors,
        has_failures,
        all_sources_failed,
    })
}

pub fn run_datasets(args: &DatasetsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["Dataset", "Attributes", "Expansions", "Mode", "Renames"]);
    apply_table_style(&mut table);
    for descriptor in &config.datasets {
        table.add_row(vec![
            descriptor.name.clone(),
            descriptor.attributes.len().to_string(),
            describe_expansions(descriptor),
            if descriptor.drop_unlisted {
                "drop-rest".to_string()
            } else {
                "keep-rest".to_string()
            },
            descriptor.rename.len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = load_pipeline_config(path)
                .with_context(|| format!("load config {}", path.display()))?;
            info!(
                path = %path.display(),
                datasets = config.datasets.len(),
                "configuration loaded"
            );
            Ok(config)
        }
        None => {
            let config = PipelineConfig::course_export_defaults();
            debug!(
                datasets = config.datasets.len(),
                "using built-in course export configuration"
            );
            Ok(config)
        }
    }
}

fn describe_expansions(descriptor: &DatasetDescriptor) -> String {
    if descriptor.expand.is_empty() {
        return "-".to_string();
    }
    descriptor
        .expand
        .iter()
        .map(|step| match step {
            ExpandStep::List { column } => format!("unroll {column}"),
            ExpandStep::Map { column, prefix } => format!("flatten {column} ({prefix}*)"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
