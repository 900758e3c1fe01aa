pub mod datetime;
pub mod error;
pub mod flatten;
pub mod normalize;
pub mod project;
pub mod unroll;

pub use datetime::{tidy_timestamp, tidy_timestamps};
pub use error::{EngineError, Result};
pub use flatten::flatten_map;
pub use normalize::{NormalizedTable, normalize_schema};
pub use project::{project_record, project_records};
pub use unroll::unroll_list;

use flatbed_model::{ExpandStep, Table};

/// Dispatch one configured expansion step.
pub fn apply_expand_step(table: &Table, step: &ExpandStep) -> Result<Table> {
    match step {
        ExpandStep::List { column } => unroll_list(table, column),
        ExpandStep::Map { column, prefix } => flatten_map(table, column, prefix),
    }
}
