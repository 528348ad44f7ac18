// src/workload/reporter.rs
//! Human-readable run summaries

use crate::workload::kind::WorkloadKind;
use crate::workload::result::{RunStatus, WorkloadResult};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Formats a `WorkloadResult` into a one-line summary
#[derive(Debug, Default, Clone, Copy)]
pub struct MeasurementReporter;

impl MeasurementReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render a summary; pure, no side effects
    pub fn summarize(&self, result: &WorkloadResult) -> String {
        let progress = format!(
            "{}/{} iterations",
            result.iterations_completed, result.iterations_requested
        );
        let units = render_units(result);
        let duration = format!("{:.2}s", result.duration_seconds);

        let mut summary = match result.status {
            RunStatus::Completed => format!(
                "Completed {}: {}, {} in {}",
                result.kind, progress, units, duration
            ),
            RunStatus::Failed => {
                let cause = match (&result.failure, &result.failure_message) {
                    (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                    (Some(kind), None) => kind.to_string(),
                    _ => "unknown failure".to_string(),
                };
                format!(
                    "Failed {} after {} ({}); {} accumulated in {}",
                    result.kind, progress, cause, units, duration
                )
            }
        };

        if let Some(average) = result.average_seconds_per_iteration() {
            summary.push_str(&format!(" (~{:.2}s per iteration", average));
            if let Some(expected_ms) = result.expected_latency_ms {
                summary.push_str(&format!(", expected {:.2}s", expected_ms as f64 / 1000.0));
            }
            summary.push(')');
        }
        summary.push('.');

        if let Some(sample) = &result.sample {
            summary.push_str(&format!(" Result: {}", sample));
        }

        summary
    }
}

fn render_units(result: &WorkloadResult) -> String {
    match result.kind {
        WorkloadKind::DiskRead => format!(
            "{} bytes ({:.2} MB)",
            result.units_accumulated,
            result.units_accumulated as f64 / BYTES_PER_MB
        ),
        kind => format!("{} {}", result.units_accumulated, kind.unit_label()),
    }
}
