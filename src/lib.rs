// src/lib.rs
//! Loopstall: blocking workload harness
//!
//! Measures how synchronous, long-running work starves a single-threaded
//! cooperative scheduler.
//!
//! # Architecture
//!
//! The crate is structured into several modules:
//!
//! - **workload**: the blocking workload simulator (accessors, runner, reporter)
//! - **server**: HTTP control surface triggering workloads on demand
//! - **runtime**: tokio runtime construction (current-thread or multi-thread)
//! - **fixtures**: dummy file generation for disk workloads
//! - **observability**: tracing and Prometheus metrics
//! - **utils**: configuration and error types

// Public module exports
pub mod fixtures;
pub mod observability;
pub mod runtime;
pub mod server;
pub mod utils;
pub mod workload;

// Re-export commonly used types
pub use utils::config::HarnessConfig;
pub use utils::errors::{HarnessError, Result};
pub use workload::{
    run, FailureKind, MeasurementReporter, RunStatus, WorkloadConfig, WorkloadKind,
    WorkloadResult, WorkloadRunner,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// `--version` text of the binary
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Build of the harness that produced a measurement
///
/// Shown on `/` and at startup so numbers taken from different builds can
/// be told apart.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "loopstall v{} ({}, built {}, {})",
            self.version, self.git_hash, self.build_timestamp, self.rustc_version
        )
    }
}
