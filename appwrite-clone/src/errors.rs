//! Error types for the clone tool.

use appwrite_client::ApiError;
use thiserror::Error;

/// Errors that stop a run before anything is written.
///
/// Failures while writing to the target are never raised as errors: they
/// become run-log lines and the run carries on.
#[derive(Error, Debug)]
pub enum CloneError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A source read needed to build the catalog failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl CloneError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
