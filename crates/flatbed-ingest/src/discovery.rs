//! Source discovery: each subdirectory of the input root is one source.

use std::path::Path;

use crate::error::{IngestError, Result};

/// List source identifiers (subdirectory names) under the input root,
/// sorted for a deterministic processing order. Hidden directories are
/// skipped.
pub fn discover_sources(input_root: &Path) -> Result<Vec<String>> {
    if !input_root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: input_root.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(input_root).map_err(|source| IngestError::DirectoryRead {
        path: input_root.to_path_buf(),
        source,
    })?;
    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: input_root.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        sources.push(name.to_string());
    }
    sources.sort();
    Ok(sources)
}
