use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("row has {actual} cells but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },
    #[error("rename map lists source column {0:?} more than once")]
    DuplicateRenameSource(String),
    #[error("dataset {dataset}: {message}")]
    InvalidDescriptor { dataset: String, message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
