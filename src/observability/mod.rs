// src/observability/mod.rs
//! Logging and metrics
//!
//! - **Tracing**: `tracing-subscriber` with `RUST_LOG` filtering, pretty or JSON
//! - **Metrics**: Prometheus recorder rendered by the control surface
//!
//! Metrics are recorded once per finished run, outside the iteration loop.

use crate::utils::config::LogFormat;
use crate::utils::errors::{HarnessError, Result};
use crate::workload::{RunStatus, WorkloadResult};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

pub const RUNS_TOTAL: &str = "loopstall_runs_total";
pub const ITERATIONS_TOTAL: &str = "loopstall_iterations_total";
pub const RUN_DURATION: &str = "loopstall_run_duration_seconds";

/// Install the global tracing subscriber
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| HarnessError::ObservabilityFailed(format!("tracing: {}", e)))
}

/// Install the Prometheus recorder and describe harness metrics
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| HarnessError::ObservabilityFailed(format!("metrics: {}", e)))?;

    describe_counter!(RUNS_TOTAL, "Workload runs by kind and terminal status");
    describe_counter!(ITERATIONS_TOTAL, "Iterations completed across all runs");
    describe_histogram!(RUN_DURATION, Unit::Seconds, "Time the runtime thread spent blocked per run");

    Ok(handle)
}

/// Record a finished run
pub fn record_run(result: &WorkloadResult) {
    let kind = result.kind.as_str();
    let status = match result.status {
        RunStatus::Completed => "completed",
        RunStatus::Failed => "failed",
    };

    counter!(RUNS_TOTAL, "kind" => kind, "status" => status).increment(1);
    counter!(ITERATIONS_TOTAL, "kind" => kind).increment(result.iterations_completed);
    histogram!(RUN_DURATION, "kind" => kind).record(result.duration_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{WorkloadConfig, WorkloadRunner};

    #[test]
    fn test_record_without_recorder_is_noop() {
        let result = WorkloadRunner::new().run(&WorkloadConfig::cpu_compute(5, 1));
        record_run(&result);
    }

    #[test]
    fn test_tracing_init_twice_fails_second_time() {
        let _ = init_tracing(LogFormat::Pretty);
        assert!(init_tracing(LogFormat::Json).is_err());
    }
}
