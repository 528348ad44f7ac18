// src/workload/runner.rs
//! Single-use workload runner
//!
//! Drives a `ResourceAccessor` through `repeat_count` iterations, strictly
//! in sequence, on the calling thread.
//!
//! ```text
//! start ──validate ok──▶ Running ──all iterations──▶ Completed
//!   │                       │
//!   └──invalid config──┐    └──first access error──▶ Failed (partial counters kept)
//!                      ▼
//!                    Failed (0 seconds)
//! ```
//!
//! There is no suspension point inside the loop. A runner hosted on a
//! cooperative scheduler holds the scheduler's thread until it reaches a
//! terminal state.

use crate::workload::accessor::{accessor_for, AccessError, ResourceAccessor};
use crate::workload::kind::WorkloadConfig;
use crate::workload::result::{FailureKind, RunStatus, WorkloadResult};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info, warn};
use ulid::Ulid;

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Completed,
    Failed,
}

/// Mutable bookkeeping of one run, owned by its runner
#[derive(Debug)]
pub struct WorkloadRun {
    pub run_id: Ulid,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
    pub end_time: Option<Instant>,
    pub iterations_completed: u64,
    pub units_accumulated: u64,
    pub status: RunState,
    pub failure: Option<(FailureKind, String)>,
    pub sample: Option<String>,
}

impl WorkloadRun {
    fn start(run_id: Ulid) -> Self {
        Self {
            run_id,
            start_time: Instant::now(),
            started_at: Utc::now(),
            end_time: None,
            iterations_completed: 0,
            units_accumulated: 0,
            status: RunState::Running,
            failure: None,
            sample: None,
        }
    }

    fn fail(&mut self, kind: FailureKind, message: String) {
        self.end_time = Some(Instant::now());
        self.status = RunState::Failed;
        self.failure = Some((kind, message));
    }

    /// Fail before the first iteration; no time is charged to the run
    fn reject(&mut self, message: String) {
        self.end_time = Some(self.start_time);
        self.status = RunState::Failed;
        self.failure = Some((FailureKind::InvalidConfig, message));
    }

    fn complete(&mut self) {
        self.end_time = Some(Instant::now());
        self.status = RunState::Completed;
    }

    fn into_result(self, config: &WorkloadConfig) -> WorkloadResult {
        let end = self.end_time.unwrap_or_else(Instant::now);
        let duration_seconds = end.duration_since(self.start_time).as_secs_f64();
        let status = match self.status {
            RunState::Completed => RunStatus::Completed,
            _ => RunStatus::Failed,
        };
        let (failure, failure_message) = match self.failure {
            Some((kind, message)) => (Some(kind), Some(message)),
            None => (None, None),
        };

        WorkloadResult {
            run_id: self.run_id.to_string(),
            kind: config.kind,
            started_at: self.started_at,
            iterations_completed: self.iterations_completed,
            iterations_requested: config.repeat_count,
            units_accumulated: self.units_accumulated,
            duration_seconds,
            status,
            failure,
            failure_message,
            sample: self.sample,
            expected_latency_ms: config.expected_latency().map(|d| d.as_millis() as u64),
        }
    }
}

/// Runs one workload to a terminal state
pub struct WorkloadRunner {
    id: Ulid,
    accessor: Option<Box<dyn ResourceAccessor>>,
}

impl WorkloadRunner {
    /// Runner that picks the accessor matching the config's kind
    pub fn new() -> Self {
        Self {
            id: Ulid::new(),
            accessor: None,
        }
    }

    /// Runner driving a caller-supplied accessor
    pub fn with_accessor(accessor: Box<dyn ResourceAccessor>) -> Self {
        Self {
            accessor: Some(accessor),
            ..Self::new()
        }
    }

    /// Execute the workload, blocking the calling thread until it ends
    ///
    /// Consumes the runner; each runner performs exactly one run.
    pub fn run(mut self, config: &WorkloadConfig) -> WorkloadResult {
        let mut run = WorkloadRun::start(self.id);

        if let Err(reason) = config.validate() {
            warn!(run_id = %self.id, "Rejected {} workload: {}", config.kind, reason);
            run.reject(reason);
            return run.into_result(config);
        }

        let mut accessor = match self.accessor.take() {
            Some(accessor) => accessor,
            None => accessor_for(config),
        };

        if accessor.kind() != config.kind {
            let reason = format!(
                "accessor for {} cannot run a {} workload",
                accessor.kind(),
                config.kind
            );
            run.reject(reason);
            return run.into_result(config);
        }

        info!(
            run_id = %self.id,
            kind = config.kind.as_str(),
            repeat = config.repeat_count,
            "Starting blocking {} workload",
            config.kind
        );

        // Re-arm the clock now that validation and setup are done
        run.start_time = Instant::now();
        run.started_at = Utc::now();

        for iteration in 0..config.repeat_count {
            match accessor.access(config) {
                Ok(outcome) => {
                    run.iterations_completed += 1;
                    run.units_accumulated = run.units_accumulated.saturating_add(outcome.units);
                    if outcome.sample.is_some() {
                        run.sample = outcome.sample;
                    }
                    debug!(
                        run_id = %self.id,
                        iteration,
                        units = outcome.units,
                        "Iteration completed"
                    );
                }
                Err(e) => {
                    warn!(
                        run_id = %self.id,
                        iteration,
                        completed = run.iterations_completed,
                        "Stopping {} workload: {}",
                        config.kind,
                        e
                    );
                    fail_run(&mut run, e);
                    break;
                }
            }
        }

        if run.status == RunState::Running {
            run.complete();
        }

        let result = run.into_result(config);
        info!(
            run_id = %self.id,
            status = ?result.status,
            iterations = result.iterations_completed,
            units = result.units_accumulated,
            "Finished {} workload in {:.2}s",
            config.kind,
            result.duration_seconds
        );
        result
    }
}

impl Default for WorkloadRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn fail_run(run: &mut WorkloadRun, error: AccessError) {
    run.fail(error.failure_kind(), error.to_string());
}

/// Run a workload with a fresh runner
pub fn run(config: &WorkloadConfig) -> WorkloadResult {
    WorkloadRunner::new().run(config)
}
