//! Domain errors for the Sweetspot engine.
//!
//! The numeric core never fails; these cover the edges where input is
//! parsed or files are touched.

use thiserror::Error;

/// Domain-level errors that can occur around the scoring engine.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown axis: {0}")]
    InvalidAxis(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
