pub mod config;
pub mod dataset;
pub mod error;
pub mod schema;
pub mod status;
pub mod table;
pub mod value;

pub use config::PipelineConfig;
pub use dataset::{DatasetDescriptor, ExpandStep};
pub use error::{ModelError, Result};
pub use schema::{ChangeLedger, ChangeRecord, Disposition, RenameMap, RenameRule};
pub use status::{RunStatus, SourceOutcome, SourceStatus};
pub use table::Table;
pub use value::{AttributeBag, cell_to_string};
