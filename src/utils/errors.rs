// src/utils/errors.rs
//! Error types for the harness
//!
//! Workload failures never surface here: a run always yields a
//! `WorkloadResult`, and its terminating failure travels inside it.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised by the harness plumbing
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration could not be loaded or is out of range
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Control surface could not bind or serve
    #[error("server error: {0}")]
    ServerFailed(String),

    /// Dummy file could not be written
    #[error("fixture creation failed: {0}")]
    FixtureFailed(String),

    /// Tracing or metrics could not be installed
    #[error("observability setup failed: {0}")]
    ObservabilityFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for HarnessError {
    fn from(e: ::config::ConfigError) -> Self {
        HarnessError::ConfigError(e.to_string())
    }
}
