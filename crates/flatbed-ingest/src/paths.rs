use std::path::{Path, PathBuf};

/// Resolves every stage location under one data root.
///
/// Per source `S` and dataset `D`:
/// raw stage `{root}/{S}/raw/{D}.csv`, cleaned stage
/// `{root}/{S}/cleaned/{D}.csv` (change ledger alongside), and the shared
/// reporting directory `{root}/report` holding per-dataset unions plus
/// `status.csv`. Paths are resolved here and nowhere else, so a run's
/// datasets never contend for the same file.
#[derive(Debug, Clone)]
pub struct StageLayout {
    root: PathBuf,
}

impl StageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self, source_id: &str) -> PathBuf {
        self.root.join(source_id).join("raw")
    }

    pub fn cleaned_dir(&self, source_id: &str) -> PathBuf {
        self.root.join(source_id).join("cleaned")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.root.join("report")
    }

    pub fn raw_table(&self, source_id: &str, dataset: &str) -> PathBuf {
        self.raw_dir(source_id).join(format!("{dataset}.csv"))
    }

    pub fn cleaned_table(&self, source_id: &str, dataset: &str) -> PathBuf {
        self.cleaned_dir(source_id).join(format!("{dataset}.csv"))
    }

    pub fn change_ledger(&self, source_id: &str, dataset: &str) -> PathBuf {
        self.cleaned_dir(source_id)
            .join(format!("{dataset}.changes.csv"))
    }

    pub fn report_table(&self, dataset: &str) -> PathBuf {
        self.report_dir().join(format!("{dataset}.csv"))
    }

    pub fn status_ledger(&self) -> PathBuf {
        self.report_dir().join("status.csv")
    }
}
