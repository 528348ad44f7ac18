// src/runtime/scheduler.rs
//! Tokio runtime construction
//!
//! `CurrentThread` gives one cooperative scheduler thread: every task,
//! including every HTTP connection, shares it and only progresses at
//! `.await` points. `MultiThread` is the contrast case.

use crate::utils::config::{RuntimeConfig, RuntimeFlavor};
use crate::utils::errors::{HarnessError, Result};
use tokio::runtime::{Builder, Runtime};
use tracing::info;

/// Build the runtime hosting the control surface
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let mut builder = match config.flavor {
        RuntimeFlavor::CurrentThread => Builder::new_current_thread(),
        RuntimeFlavor::MultiThread => {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(config.worker_threads);
            builder
        }
    };

    let runtime = builder
        .enable_all()
        .thread_name("loopstall-rt")
        .build()
        .map_err(|e| HarnessError::ServerFailed(format!("Failed to build runtime: {}", e)))?;

    info!("Built {:?} runtime", config.flavor);
    Ok(runtime)
}
