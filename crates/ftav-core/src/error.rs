//! Error types for the ftav-core library.
//!
//! Extraction and rule evaluation are total and never fail; errors only
//! arise at the configuration and I/O boundary.

use thiserror::Error;

/// Main error type for the ftav library.
#[derive(Error, Debug)]
pub enum FtaError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the ftav library.
pub type Result<T> = std::result::Result<T, FtaError>;
