// src/workload/result.rs
//! Immutable snapshot of a finished run

use crate::workload::kind::WorkloadKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Why a run ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected before any work started
    InvalidConfig,

    /// Disk target absent
    ResourceNotFound,

    /// Disk read error
    IoFailure,

    /// Transport error or non-success status
    NetworkFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidConfig => "invalid config",
            FailureKind::ResourceNotFound => "resource not found",
            FailureKind::IoFailure => "I/O failure",
            FailureKind::NetworkFailure => "network failure",
        };
        f.write_str(name)
    }
}

/// Result of one run, the only artifact leaving the core
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadResult {
    /// Unique run ID (ULID)
    pub run_id: String,

    pub kind: WorkloadKind,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    pub iterations_completed: u64,
    pub iterations_requested: u64,

    /// Bytes, responses or bits depending on `kind`
    pub units_accumulated: u64,

    /// Elapsed time up to completion or failure
    pub duration_seconds: f64,

    pub status: RunStatus,

    /// Terminating failure, present only when `status` is `Failed`
    pub failure: Option<FailureKind>,
    pub failure_message: Option<String>,

    /// Truncated rendering of the last computed value (cpu only)
    pub sample: Option<String>,

    /// Configured per-call latency (network only)
    pub expected_latency_ms: Option<u64>,
}

impl WorkloadResult {
    /// Result for a workload rejected before it could start
    pub fn invalid(kind: WorkloadKind, iterations_requested: u64, reason: impl Into<String>) -> Self {
        Self {
            run_id: ulid::Ulid::new().to_string(),
            kind,
            started_at: Utc::now(),
            iterations_completed: 0,
            iterations_requested,
            units_accumulated: 0,
            duration_seconds: 0.0,
            status: RunStatus::Failed,
            failure: Some(FailureKind::InvalidConfig),
            failure_message: Some(reason.into()),
            sample: None,
            expected_latency_ms: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Average seconds per completed iteration; `None` when nothing completed
    pub fn average_seconds_per_iteration(&self) -> Option<f64> {
        if self.iterations_completed == 0 {
            return None;
        }
        Some(self.duration_seconds / self.iterations_completed as f64)
    }
}
