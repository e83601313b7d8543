use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid scenario: {field} = {value} ({reason})")]
    InvalidScenario {
        field:  &'static str,
        value:  f64,
        reason: &'static str,
    },

    #[error("Invalid cost catalog entry '{category}': {reason}")]
    InvalidCatalogEntry { category: String, reason: String },

    #[error("Duplicate cost category '{category}'")]
    DuplicateCategory { category: String },

    #[error("Cost category '{category}' not found")]
    UnknownCategory { category: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
