use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::table::Table;

/// One declarative column rename: `source` in the incoming table becomes
/// `target` in the normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    pub source: String,
    pub target: String,
}

impl RenameRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// An ordered rename map. Order is significant: under drop-rest
/// normalization the output columns follow rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameMap {
    rules: Vec<RenameRule>,
}

impl RenameMap {
    pub fn new(rules: Vec<RenameRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Deserialization does not go through a checked constructor, so callers
    /// validate once at configuration time.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.source.as_str()) {
                return Err(ModelError::DuplicateRenameSource(rule.source.clone()));
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[RenameRule] {
        &self.rules
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.source == source)
            .map(|rule| rule.target.as_str())
    }

    pub fn contains_source(&self, source: &str) -> bool {
        self.target_for(source).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// What happened to one original column during schema normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Renamed,
    Unchanged,
    Deleted,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Disposition::Renamed => "renamed",
            Disposition::Unchanged => "unchanged",
            Disposition::Deleted => "deleted",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub original: String,
    pub current: Option<String>,
    pub disposition: Disposition,
}

impl ChangeRecord {
    pub fn renamed(original: impl Into<String>, current: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            current: Some(current.into()),
            disposition: Disposition::Renamed,
        }
    }

    pub fn unchanged(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            original: name.clone(),
            current: Some(name),
            disposition: Disposition::Unchanged,
        }
    }

    pub fn deleted(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            current: None,
            disposition: Disposition::Deleted,
        }
    }
}

/// One record per original column; auditability only, never consulted for
/// correctness of the normalized table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLedger {
    pub records: Vec<ChangeRecord>,
}

impl ChangeLedger {
    pub fn push(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    pub fn deleted_count(&self) -> usize {
        self.count(Disposition::Deleted)
    }

    pub fn renamed_count(&self) -> usize {
        self.count(Disposition::Renamed)
    }

    fn count(&self, disposition: Disposition) -> usize {
        self.records
            .iter()
            .filter(|record| record.disposition == disposition)
            .count()
    }

    /// Ledger as a three-column table, ready for the stage writer.
    pub fn to_table(&self) -> Result<Table> {
        let mut table = Table::new(vec![
            "original".to_string(),
            "current".to_string(),
            "disposition".to_string(),
        ])?;
        for record in &self.records {
            table.push_row(vec![
                Value::String(record.original.clone()),
                record
                    .current
                    .as_ref()
                    .map(|name| Value::String(name.clone()))
                    .unwrap_or(Value::Null),
                Value::String(record.disposition.to_string()),
            ])?;
        }
        Ok(table)
    }
}
