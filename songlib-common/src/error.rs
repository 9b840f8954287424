//! Common error types for the song catalog

use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Catalog error taxonomy
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required input (bad date, non-positive id, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Referenced group or song does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Metadata enricher unreachable or returned a non-success/malformed response
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A deadline expired while waiting on the store or the enricher.
    /// Callers may retry.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Write rejected by a store constraint other than a missing reference
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the same call may succeed if issued again later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}
