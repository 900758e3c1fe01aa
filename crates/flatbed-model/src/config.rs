use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetDescriptor, ExpandStep};
use crate::error::{ModelError, Result};
use crate::schema::{RenameMap, RenameRule};

/// Declarative run configuration: the datasets to process and optional
/// human-readable labels for source identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub datasets: Vec<DatasetDescriptor>,
    /// Source id to display label, used in the run ledger. Unlisted sources
    /// fall back to their identifier.
    #[serde(default)]
    pub source_labels: BTreeMap<String, String>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        let mut names = std::collections::BTreeSet::new();
        for descriptor in &self.datasets {
            descriptor.validate()?;
            if !names.insert(descriptor.name.as_str()) {
                return Err(ModelError::InvalidDescriptor {
                    dataset: descriptor.name.clone(),
                    message: "dataset name is listed more than once".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetDescriptor> {
        self.datasets
            .iter()
            .find(|descriptor| descriptor.name == name)
    }

    pub fn label_for<'a>(&'a self, source_id: &'a str) -> &'a str {
        self.source_labels
            .get(source_id)
            .map(String::as_str)
            .unwrap_or(source_id)
    }

    /// Built-in descriptors for an LMS-style course export, so the tool is
    /// usable without a config file. Module items arrive nested inside the
    /// module records; completion requirements nest one level further.
    pub fn course_export_defaults() -> Self {
        let modules = DatasetDescriptor {
            name: "modules".to_string(),
            attributes: strings(&[
                "id",
                "name",
                "position",
                "unlock_at",
                "require_sequential_progress",
                "publish_final_grade",
                "prerequisite_module_ids",
                "published",
                "items_count",
                "items",
                "course_id",
            ]),
            expand: vec![
                ExpandStep::List {
                    column: "items".to_string(),
                },
                ExpandStep::Map {
                    column: "items".to_string(),
                    prefix: "items_".to_string(),
                },
                ExpandStep::Map {
                    column: "items_completion_requirement".to_string(),
                    prefix: "items_completion_req_".to_string(),
                },
            ],
            rename: RenameMap::new(vec![
                RenameRule::new("id", "module_id"),
                RenameRule::new("name", "module_name"),
                RenameRule::new("position", "module_position"),
            ]),
            drop_unlisted: false,
            tidy_timestamps: strings(&["unlock_at"]),
        };

        let enrollments = DatasetDescriptor {
            name: "enrollments".to_string(),
            attributes: strings(&[
                "id",
                "user_id",
                "course_id",
                "type",
                "created_at",
                "grades",
            ]),
            expand: vec![ExpandStep::Map {
                column: "grades".to_string(),
                prefix: "grades_".to_string(),
            }],
            rename: RenameMap::new(vec![
                RenameRule::new("id", "enrollment_id"),
                RenameRule::new("user_id", "user_id"),
                RenameRule::new("course_id", "course_id"),
                RenameRule::new("type", "enrollment_type"),
                RenameRule::new("created_at", "enrolled_at"),
                RenameRule::new("grades_current_score", "current_score"),
                RenameRule::new("grades_final_score", "final_score"),
            ]),
            drop_unlisted: true,
            tidy_timestamps: strings(&["created_at"]),
        };

        let assignments = DatasetDescriptor {
            name: "assignments".to_string(),
            attributes: strings(&[
                "id",
                "name",
                "due_at",
                "points_possible",
                "published",
                "submission_types",
                "course_id",
            ]),
            expand: vec![ExpandStep::List {
                column: "submission_types".to_string(),
            }],
            rename: RenameMap::new(vec![
                RenameRule::new("id", "assignment_id"),
                RenameRule::new("name", "assignment_name"),
            ]),
            drop_unlisted: false,
            tidy_timestamps: strings(&["due_at"]),
        };

        Self {
            datasets: vec![modules, enrollments, assignments],
            source_labels: BTreeMap::new(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
