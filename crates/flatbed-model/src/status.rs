use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOutcome {
    Pending,
    Success,
    Failed,
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SourceOutcome::Pending => "pending",
            SourceOutcome::Success => "success",
            SourceOutcome::Failed => "failed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub label: String,
    pub outcome: SourceOutcome,
    pub message: String,
}

/// Per-source run ledger, keyed by source identifier in registration order.
///
/// Owned and mutated by the orchestrating run and handed to the report
/// writer at the end; threaded as a value, never a process-wide global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    entries: Vec<(String, SourceStatus)>,
}

impl RunStatus {
    pub fn register(&mut self, source_id: impl Into<String>, label: impl Into<String>) {
        self.entries.push((
            source_id.into(),
            SourceStatus {
                label: label.into(),
                outcome: SourceOutcome::Pending,
                message: String::new(),
            },
        ));
    }

    pub fn record_success(&mut self, source_id: &str, message: impl Into<String>) {
        self.record(source_id, SourceOutcome::Success, message.into());
    }

    pub fn record_failure(&mut self, source_id: &str, message: impl Into<String>) {
        self.record(source_id, SourceOutcome::Failed, message.into());
    }

    fn record(&mut self, source_id: &str, outcome: SourceOutcome, message: String) {
        if let Some((_, entry)) = self.entries.iter_mut().find(|(id, _)| id == source_id) {
            entry.outcome = outcome;
            entry.message = message;
        } else {
            self.entries.push((
                source_id.to_string(),
                SourceStatus {
                    label: source_id.to_string(),
                    outcome,
                    message,
                },
            ));
        }
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceStatus> {
        self.entries
            .iter()
            .find(|(id, _)| id == source_id)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceStatus)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.outcome == SourceOutcome::Failed)
            .count()
    }

    /// True when every registered source failed; the run as a whole is then
    /// considered unsuccessful.
    pub fn all_failed(&self) -> bool {
        !self.entries.is_empty() && self.failure_count() == self.entries.len()
    }
}
