//! Error types for configuration loading and report output.
//!
//! The parse itself never fails; these cover the fallible edges around it:
//! reading configuration, reading inputs, and serializing results.

use thiserror::Error;

/// Errors that can occur outside the parse itself.
#[derive(Debug, Error)]
pub enum RunlogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`RunlogError`].
pub type Result<T> = std::result::Result<T, RunlogError>;
