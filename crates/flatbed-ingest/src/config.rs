use std::fs;
use std::path::Path;

use flatbed_model::PipelineConfig;

use crate::error::{IngestError, Result};

/// Load and validate a pipeline configuration from a JSON file.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::file_read(path, source))?;
    let config: PipelineConfig =
        serde_json::from_str(&text).map_err(|error| IngestError::json(path, error.to_string()))?;
    config
        .validate()
        .map_err(|source| IngestError::model(path, source))?;
    Ok(config)
}
