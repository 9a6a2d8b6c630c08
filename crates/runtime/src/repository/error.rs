//! Error types raised by repository implementations.

use thiserror::Error;

use effect_core::AttributeError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl From<RepositoryError> for AttributeError {
    fn from(err: RepositoryError) -> Self {
        AttributeError::Backend(err.to_string())
    }
}
