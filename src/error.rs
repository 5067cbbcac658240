//! Error types for stash.

use thiserror::Error;

/// Common error type for stash operations.
#[derive(Error, Debug)]
pub enum StashError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx backend as a plain message so callers
    /// never need to depend on sqlx error types directly.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error (blob storage, config files, log files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation (e.g. registering an email twice).
    #[error("{0} already exists")]
    Duplicate(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StashError {
    fn from(e: sqlx::Error) -> Self {
        StashError::Database(e.to_string())
    }
}

/// Result type alias for stash operations.
pub type Result<T> = std::result::Result<T, StashError>;
