use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::RenameMap;

/// One expansion applied to a dataset's projected table, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpandStep {
    /// Unroll a sequence-valued column into one row per element.
    List { column: String },
    /// Flatten a mapping-valued column into prefixed derived columns.
    Map { column: String, prefix: String },
}

impl ExpandStep {
    pub fn column(&self) -> &str {
        match self {
            ExpandStep::List { column } => column,
            ExpandStep::Map { column, .. } => column,
        }
    }
}

/// Everything the pipeline needs to know about one named dataset.
/// Built once at configuration time and read-only for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    /// Attribute list for projection; also the raw-stage column order.
    pub attributes: Vec<String>,
    /// Expansion steps applied after projection, before the raw stage.
    #[serde(default)]
    pub expand: Vec<ExpandStep>,
    #[serde(default)]
    pub rename: RenameMap,
    /// Drop-rest when true: only renamed columns survive normalization.
    #[serde(default)]
    pub drop_unlisted: bool,
    /// Timestamp columns rewritten to `YYYY-MM-DD HH:MM:SS` form.
    #[serde(default)]
    pub tidy_timestamps: Vec<String>,
}

impl DatasetDescriptor {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidDescriptor {
                dataset: self.name.clone(),
                message: "dataset name is empty".to_string(),
            });
        }
        if self.attributes.is_empty() {
            return Err(ModelError::InvalidDescriptor {
                dataset: self.name.clone(),
                message: "attribute list is empty".to_string(),
            });
        }
        self.rename.validate()?;
        for step in &self.expand {
            if let ExpandStep::Map { prefix, column } = step
                && prefix.is_empty()
            {
                return Err(ModelError::InvalidDescriptor {
                    dataset: self.name.clone(),
                    message: format!("map expansion of {column:?} has an empty prefix"),
                });
            }
        }
        Ok(())
    }
}
