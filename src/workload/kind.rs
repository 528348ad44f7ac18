// src/workload/kind.rs
//! Workload kinds and their immutable run configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Kind of blocking work a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
    /// Read a whole file into memory
    DiskRead,

    /// One synchronous HTTP round-trip
    NetworkCall,

    /// Fixed-size arbitrary precision arithmetic
    CpuCompute,
}

impl WorkloadKind {
    /// Short name used in routes, metric labels and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::DiskRead => "disk",
            WorkloadKind::NetworkCall => "network",
            WorkloadKind::CpuCompute => "cpu",
        }
    }

    /// Unit accumulated per successful iteration
    pub fn unit_label(&self) -> &'static str {
        match self {
            WorkloadKind::DiskRead => "bytes",
            WorkloadKind::NetworkCall => "responses",
            WorkloadKind::CpuCompute => "bits",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadKind::DiskRead => "disk read",
            WorkloadKind::NetworkCall => "network call",
            WorkloadKind::CpuCompute => "cpu compute",
        };
        f.write_str(name)
    }
}

impl FromStr for WorkloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disk" | "disk_read" | "diskread" => Ok(WorkloadKind::DiskRead),
            "network" | "network_call" | "networkcall" => Ok(WorkloadKind::NetworkCall),
            "cpu" | "cpu_compute" | "cpucompute" => Ok(WorkloadKind::CpuCompute),
            other => Err(format!("unknown workload kind '{}'", other)),
        }
    }
}

/// Kind-specific parameter of a workload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// File read on every iteration
    File { path: PathBuf },

    /// Endpoint hit on every iteration
    Endpoint {
        url: String,
        /// Latency the endpoint is expected to add per call
        expected_latency: Duration,
        /// Transport timeout per call; `None` waits indefinitely
        timeout: Option<Duration>,
    },

    /// `n` in `n!`
    ProblemSize { n: u64 },
}

/// Immutable input of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub kind: WorkloadKind,
    pub repeat_count: u64,
    pub resource: ResourceRef,
}

impl WorkloadConfig {
    pub fn disk_read(path: impl Into<PathBuf>, repeat_count: u64) -> Self {
        Self {
            kind: WorkloadKind::DiskRead,
            repeat_count,
            resource: ResourceRef::File { path: path.into() },
        }
    }

    pub fn network_call(
        url: impl Into<String>,
        expected_latency: Duration,
        repeat_count: u64,
    ) -> Self {
        Self {
            kind: WorkloadKind::NetworkCall,
            repeat_count,
            resource: ResourceRef::Endpoint {
                url: url.into(),
                expected_latency,
                timeout: None,
            },
        }
    }

    pub fn cpu_compute(n: u64, repeat_count: u64) -> Self {
        Self {
            kind: WorkloadKind::CpuCompute,
            repeat_count,
            resource: ResourceRef::ProblemSize { n },
        }
    }

    /// Set a per-call transport timeout (network workloads only)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let ResourceRef::Endpoint { timeout: t, .. } = &mut self.resource {
            *t = Some(timeout);
        }
        self
    }

    /// Expected per-call latency, if this is a network workload
    pub fn expected_latency(&self) -> Option<Duration> {
        match &self.resource {
            ResourceRef::Endpoint { expected_latency, .. } => Some(*expected_latency),
            _ => None,
        }
    }

    /// Validate the configuration before any work starts
    pub fn validate(&self) -> Result<(), String> {
        if self.repeat_count == 0 {
            return Err("repeat count must be at least 1".to_string());
        }

        match (&self.kind, &self.resource) {
            (WorkloadKind::DiskRead, ResourceRef::File { path }) => {
                if path.as_os_str().is_empty() {
                    return Err("file path cannot be empty".to_string());
                }
            }
            (WorkloadKind::NetworkCall, ResourceRef::Endpoint { url, timeout, .. }) => {
                let parsed = url::Url::parse(url)
                    .map_err(|e| format!("invalid endpoint url '{}': {}", url, e))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(format!("unsupported url scheme '{}'", parsed.scheme()));
                }
                if matches!(timeout, Some(t) if t.is_zero()) {
                    return Err("network timeout cannot be 0".to_string());
                }
            }
            (WorkloadKind::CpuCompute, ResourceRef::ProblemSize { n }) => {
                if *n == 0 {
                    return Err("problem size must be at least 1".to_string());
                }
            }
            (kind, resource) => {
                return Err(format!(
                    "resource {:?} does not match workload kind {}",
                    resource, kind
                ));
            }
        }

        Ok(())
    }
}
