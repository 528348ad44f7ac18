// src/workload/mod.rs
//! Blocking workload simulator
//!
//! The measured core of the harness:
//!
//! - **Kind**: workload kinds and their validated, immutable configuration
//! - **Accessor**: one blocking unit of work per resource kind
//! - **Runner**: single-use state machine repeating the unit of work
//! - **Result**: immutable snapshot handed to callers
//! - **Reporter**: summary text for a result
//!
//! # Architecture
//!
//! ```text
//! trigger ──run(config)──▶ WorkloadRunner ──access()×N──▶ ResourceAccessor
//!                                │                       (disk | network | cpu)
//!                                ▼
//!                          WorkloadResult ──▶ MeasurementReporter ──▶ text
//! ```
//!
//! Nothing in here is async. Called from a task on a single-threaded
//! runtime, a run keeps every other task on that runtime waiting.

pub mod accessor;
pub mod kind;
pub mod reporter;
pub mod result;
pub mod runner;

// Re-export commonly used types
pub use accessor::{accessor_for, AccessError, AccessOutcome, ResourceAccessor};
pub use kind::{ResourceRef, WorkloadConfig, WorkloadKind};
pub use reporter::MeasurementReporter;
pub use result::{FailureKind, RunStatus, WorkloadResult};
pub use runner::{run, RunState, WorkloadRun, WorkloadRunner};
