use flatbed_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The named column is absent; callers treat this as "nothing to
    /// expand" for the dataset and skip the step rather than abort.
    #[error("missing expansion column: {column}")]
    MissingExpansionColumn { column: String },

    /// Two distinct mapping keys derive the same column name. Surfaced
    /// instead of picking a value; fatal for the dataset only.
    #[error(
        "ambiguous flattening of {column}: keys {first:?} and {second:?} both derive column {derived:?}"
    )]
    AmbiguousFlattening {
        column: String,
        derived: String,
        first: String,
        second: String,
    },

    /// A cell in a mapping-valued column is neither a mapping, its JSON
    /// text encoding, nor null.
    #[error("column {column}, row {row}: cell is not a mapping")]
    InvalidMapCell { column: String, row: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl EngineError {
    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::MissingExpansionColumn { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
