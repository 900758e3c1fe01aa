//! End-to-end pipeline tests over a temporary input tree.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use flatbed_cli::cli::RunArgs;
use flatbed_cli::commands::run_pipeline;
use flatbed_ingest::read_table;
use flatbed_model::SourceOutcome;

fn write_config(path: &Path) {
    let config = json!({
        "datasets": [{
            "name": "modules",
            "attributes": ["id", "name", "items", "course_id"],
            "expand": [
                {"kind": "list", "column": "items"},
                {"kind": "map", "column": "items", "prefix": "items_"}
            ],
            "rename": [
                {"source": "id", "target": "module_id"},
                {"source": "name", "target": "module_name"},
                {"source": "items_id", "target": "item_id"},
                {"source": "items_title", "target": "item_title"},
                {"source": "course_id", "target": "course_id"}
            ],
            "drop_unlisted": true
        }],
        "source_labels": {"39216": "Intro Biology"}
    });
    fs::write(path, config.to_string()).expect("write config");
}

fn run_args(input_root: &Path, config: &Path) -> RunArgs {
    RunArgs {
        input_root: input_root.to_path_buf(),
        config: Some(config.to_path_buf()),
        data_root: None,
        sources: Vec::new(),
        dry_run: false,
    }
}

#[test]
fn a_two_source_run_stages_cleans_and_unions() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join("flatbed.json");
    write_config(&config_path);

    let input_root = root.path().join("input");
    fs::create_dir_all(input_root.join("39216")).expect("mkdir");
    fs::create_dir_all(input_root.join("44100")).expect("mkdir");
    fs::write(
        input_root.join("39216/modules.json"),
        json!([
            {"id": 1, "name": "Mod A", "course_id": 39216, "items": [
                {"id": 10, "title": "Page"},
                {"id": 11, "title": "Quiz"}
            ]},
            {"id": 2, "name": "Empty Mod", "course_id": 39216, "items": []}
        ])
        .to_string(),
    )
    .expect("write modules");
    fs::write(
        input_root.join("44100/modules.json"),
        json!([
            {"id": 7, "name": "Week 1", "course_id": 44100, "items": [
                {"id": 70, "title": "Reading"}
            ]}
        ])
        .to_string(),
    )
    .expect("write modules");

    let result = run_pipeline(&run_args(&input_root, &config_path)).expect("run");
    assert!(!result.has_failures, "errors: {:?}", result.errors);
    assert!(!result.all_sources_failed);

    // Both sources succeeded in the ledger.
    for (_, entry) in result.status.iter() {
        assert_eq!(entry.outcome, SourceOutcome::Success);
    }
    assert_eq!(result.status.get("39216").map(|e| e.label.as_str()), Some("Intro Biology"));

    // Raw stage: the empty module dropped during unroll, so two item rows.
    let raw = read_table(&input_root.join("data/39216/raw/modules.csv")).expect("raw stage");
    assert_eq!(raw.height(), 2);
    assert_eq!(
        raw.columns(),
        ["id", "name", "course_id", "items_id", "items_title"]
    );

    // Cleaned stage: drop-rest projection onto the rename targets.
    let cleaned =
        read_table(&input_root.join("data/39216/cleaned/modules.csv")).expect("cleaned stage");
    assert_eq!(
        cleaned.columns(),
        ["module_id", "module_name", "item_id", "item_title", "course_id"]
    );
    assert_eq!(cleaned.cell(0, "item_title"), Some(&json!("Page")));

    // Change ledger written alongside the cleaned stage.
    let ledger =
        read_table(&input_root.join("data/39216/cleaned/modules.changes.csv")).expect("ledger");
    assert_eq!(ledger.columns(), ["original", "current", "disposition"]);

    // Reporting union across both sources.
    assert_eq!(result.datasets.len(), 1);
    assert_eq!(result.datasets[0].sources_ok, 2);
    assert_eq!(result.datasets[0].report_rows, 3);
    let report = read_table(&input_root.join("data/report/modules.csv")).expect("report");
    assert_eq!(report.height(), 3);
    assert_eq!(report.cell(2, "module_name"), Some(&json!("Week 1")));

    // Status ledger exists with one row per source.
    let status = read_table(&input_root.join("data/report/status.csv")).expect("status");
    assert_eq!(status.height(), 2);
    assert_eq!(status.cell(0, "outcome"), Some(&json!("success")));
}

#[test]
fn a_broken_source_fails_alone_and_the_run_continues() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join("flatbed.json");
    write_config(&config_path);

    let input_root = root.path().join("input");
    fs::create_dir_all(input_root.join("39216")).expect("mkdir");
    fs::create_dir_all(input_root.join("44100")).expect("mkdir");
    fs::write(
        input_root.join("39216/modules.json"),
        json!([{"id": 1, "name": "Mod A", "course_id": 39216, "items": [{"id": 10, "title": "Page"}]}])
            .to_string(),
    )
    .expect("write modules");
    // 44100 exports nothing: fetching its modules dataset fails.

    let result = run_pipeline(&run_args(&input_root, &config_path)).expect("run");
    assert!(result.has_failures);
    assert!(!result.all_sources_failed);

    assert_eq!(
        result.status.get("39216").map(|e| e.outcome),
        Some(SourceOutcome::Success)
    );
    let failed = result.status.get("44100").expect("44100 entry");
    assert_eq!(failed.outcome, SourceOutcome::Failed);
    assert!(failed.message.contains("modules"));

    // The union still covers the healthy source.
    assert_eq!(result.datasets[0].sources_ok, 1);
    assert_eq!(result.datasets[0].report_rows, 1);

    // The ledger records both outcomes.
    let status = read_table(&input_root.join("data/report/status.csv")).expect("status");
    assert_eq!(status.height(), 2);
}

#[test]
fn a_run_where_every_source_fails_is_unsuccessful() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join("flatbed.json");
    write_config(&config_path);

    let input_root = root.path().join("input");
    fs::create_dir_all(input_root.join("44100")).expect("mkdir");

    let result = run_pipeline(&run_args(&input_root, &config_path)).expect("run");
    assert!(result.all_sources_failed);
    assert_eq!(result.status.failure_count(), 1);
    // The status ledger is still written: it is the record of what failed.
    assert!(input_root.join("data/report/status.csv").is_file());
}

#[test]
fn a_dry_run_writes_nothing() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join("flatbed.json");
    write_config(&config_path);

    let input_root = root.path().join("input");
    fs::create_dir_all(input_root.join("39216")).expect("mkdir");

    let mut args = run_args(&input_root, &config_path);
    args.dry_run = true;
    let result = run_pipeline(&args).expect("dry run");
    assert!(result.status_ledger.is_none());
    assert_eq!(
        result.status.get("39216").map(|e| e.outcome),
        Some(SourceOutcome::Pending)
    );
    assert!(!input_root.join("data").exists());
}

#[test]
fn an_empty_input_root_is_an_error() {
    let root = TempDir::new().expect("temp dir");
    let config_path = root.path().join("flatbed.json");
    write_config(&config_path);
    let input_root = root.path().join("input");
    fs::create_dir_all(&input_root).expect("mkdir");

    assert!(run_pipeline(&run_args(&input_root, &config_path)).is_err());
}
