//! Common error types for Crux

use thiserror::Error;

/// Common result type for Crux operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Crux crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One of the input datasets could not be fetched or parsed
    #[error("Data load failure: {0}")]
    DataLoad(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
