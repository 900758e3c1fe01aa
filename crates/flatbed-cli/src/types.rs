use std::path::PathBuf;

use flatbed_model::RunStatus;

#[derive(Debug)]
pub struct RunResult {
    pub data_root: PathBuf,
    pub report_dir: PathBuf,
    pub status_ledger: Option<PathBuf>,
    pub datasets: Vec<DatasetSummary>,
    pub status: RunStatus,
    pub errors: Vec<String>,
    /// Any per-source failure or union error occurred; the ledger has the
    /// details. Does not by itself fail the process.
    pub has_failures: bool,
    /// Every source failed; the run produced nothing and exits nonzero.
    pub all_sources_failed: bool,
}

#[derive(Debug)]
pub struct DatasetSummary {
    pub name: String,
    /// Sources whose cleaned stage made it into the union.
    pub sources_ok: usize,
    pub report_rows: usize,
    pub report_path: Option<PathBuf>,
}
