//! Source connectors: where attribute bags come from.
//!
//! The pipeline only sees the trait; retries, authentication, and transport
//! concerns belong to connector implementations, never to the core.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use flatbed_model::AttributeBag;

use crate::error::{IngestError, Result};

pub trait SourceConnector {
    /// Fetch every record of the named dataset for this connector's source.
    fn fetch(&self, dataset: &str) -> Result<Vec<AttributeBag>>;
}

/// Reads datasets from a directory of JSON exports: `{dir}/{dataset}.json`
/// holding an array of objects, or `{dir}/{dataset}.jsonl` holding one
/// object per line.
#[derive(Debug, Clone)]
pub struct JsonDirConnector {
    dir: PathBuf,
}

impl JsonDirConnector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SourceConnector for JsonDirConnector {
    fn fetch(&self, dataset: &str) -> Result<Vec<AttributeBag>> {
        let json_path = self.dir.join(format!("{dataset}.json"));
        if json_path.is_file() {
            return read_bag_array(&json_path);
        }
        let jsonl_path = self.dir.join(format!("{dataset}.jsonl"));
        if jsonl_path.is_file() {
            return read_bag_lines(&jsonl_path);
        }
        Err(IngestError::DatasetNotFound {
            dataset: dataset.to_string(),
            dir: self.dir.clone(),
        })
    }
}

fn read_bag_array(path: &Path) -> Result<Vec<AttributeBag>> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::file_read(path, source))?;
    let parsed: Value =
        serde_json::from_str(&text).map_err(|error| IngestError::json(path, error.to_string()))?;
    let Value::Array(items) = parsed else {
        return Err(IngestError::json(path, "expected a JSON array of objects"));
    };
    let mut bags = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(bag) => bags.push(bag),
            _ => {
                return Err(IngestError::json(
                    path,
                    format!("element {index} is not an object"),
                ));
            }
        }
    }
    debug!(path = %path.display(), records = bags.len(), "dataset fetched");
    Ok(bags)
}

fn read_bag_lines(path: &Path) -> Result<Vec<AttributeBag>> {
    let file = fs::File::open(path).map_err(|source| IngestError::file_read(path, source))?;
    let reader = BufReader::new(file);
    let mut bags = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IngestError::file_read(path, source))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: Value = serde_json::from_str(&line)
            .map_err(|error| IngestError::json(path, format!("line {}: {error}", number + 1)))?;
        match parsed {
            Value::Object(bag) => bags.push(bag),
            _ => {
                return Err(IngestError::json(
                    path,
                    format!("line {}: not an object", number + 1),
                ));
            }
        }
    }
    debug!(path = %path.display(), records = bags.len(), "dataset fetched");
    Ok(bags)
}
