//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("manifest not loaded")]
    ManifestNotLoaded,

    #[error("collection index not found: {0}")]
    CollectionNotFound(usize),

    #[error("manifest index not found: {0}")]
    ManifestNotFound(usize),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
