// src/workload/accessor.rs
//! Primitive blocking units of work
//!
//! Every strategy runs to completion on the calling thread. None of them
//! is async, spawns, or yields: the whole point is that a caller sitting on
//! a cooperative scheduler gets no chance to run anything else meanwhile.
//!
//! - **DiskReader**: `std::fs::read` of the whole file
//! - **NetworkCaller**: one `ureq` GET (a blocking client)
//! - **CpuComputer**: `n!` over `BigUint`

use crate::workload::kind::{ResourceRef, WorkloadConfig, WorkloadKind};
use crate::workload::result::FailureKind;
use num_bigint::BigUint;
use std::io::ErrorKind;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

/// Number of leading decimal digits kept from a cpu result
pub const SAMPLE_DIGITS: usize = 100;

/// Outcome of one successful access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Units produced by this iteration
    pub units: u64,

    /// Optional human-readable rendering of what was produced
    pub sample: Option<String>,
}

impl AccessOutcome {
    pub fn units(units: u64) -> Self {
        Self { units, sample: None }
    }
}

/// Failure of one access; terminates the run
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("read failed: {0}")]
    Io(String),

    #[error("network call failed: {0}")]
    Network(String),

    #[error("resource does not match accessor: {0}")]
    Mismatch(String),
}

impl AccessError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AccessError::NotFound(_) => FailureKind::ResourceNotFound,
            AccessError::Io(_) => FailureKind::IoFailure,
            AccessError::Network(_) => FailureKind::NetworkFailure,
            AccessError::Mismatch(_) => FailureKind::InvalidConfig,
        }
    }
}

/// One blocking unit of work against one resource kind
///
/// Implementations must finish the whole operation before returning and
/// must never retry internally.
pub trait ResourceAccessor: Send {
    /// Kind of resource this accessor drives
    fn kind(&self) -> WorkloadKind;

    /// Perform one iteration
    fn access(&mut self, config: &WorkloadConfig) -> Result<AccessOutcome, AccessError>;
}

/// Build the accessor matching a workload kind
pub fn accessor_for(config: &WorkloadConfig) -> Box<dyn ResourceAccessor> {
    match config.kind {
        WorkloadKind::DiskRead => Box::new(DiskReader::new()),
        WorkloadKind::NetworkCall => {
            let timeout = match &config.resource {
                ResourceRef::Endpoint { timeout, .. } => *timeout,
                _ => None,
            };
            Box::new(NetworkCaller::new(timeout))
        }
        WorkloadKind::CpuCompute => Box::new(CpuComputer::new()),
    }
}

/// Reads the whole target file into memory
#[derive(Debug, Default)]
pub struct DiskReader;

impl DiskReader {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceAccessor for DiskReader {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::DiskRead
    }

    fn access(&mut self, config: &WorkloadConfig) -> Result<AccessOutcome, AccessError> {
        let ResourceRef::File { path } = &config.resource else {
            return Err(AccessError::Mismatch(format!("{:?}", config.resource)));
        };

        if !path.exists() {
            return Err(AccessError::NotFound(path.display().to_string()));
        }

        let data = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AccessError::NotFound(path.display().to_string()),
            _ => AccessError::Io(format!("{}: {}", path.display(), e)),
        })?;

        trace!("Read {} bytes from {:?}", data.len(), path);
        Ok(AccessOutcome::units(data.len() as u64))
    }
}

/// Issues one synchronous GET per access
pub struct NetworkCaller {
    agent: ureq::Agent,
}

impl NetworkCaller {
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
        }
    }
}

impl ResourceAccessor for NetworkCaller {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::NetworkCall
    }

    fn access(&mut self, config: &WorkloadConfig) -> Result<AccessOutcome, AccessError> {
        let ResourceRef::Endpoint { url, .. } = &config.resource else {
            return Err(AccessError::Mismatch(format!("{:?}", config.resource)));
        };

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(AccessError::Network(format!("{} returned status {}", url, code)));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(AccessError::Network(transport.to_string()));
            }
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(AccessError::Network(format!("{} returned status {}", url, status)));
        }

        // Drain the body so the round-trip is complete before returning
        response
            .into_string()
            .map_err(|e| AccessError::Network(format!("body read error: {}", e)))?;

        trace!("{} answered {}", url, status);
        Ok(AccessOutcome::units(1))
    }
}

/// Computes `n!` with arbitrary precision
#[derive(Debug, Default)]
pub struct CpuComputer;

impl CpuComputer {
    pub fn new() -> Self {
        Self
    }

    /// `n!`, evaluated as a growing product over `2..=n`
    pub fn factorial(n: u64) -> BigUint {
        let mut product = BigUint::from(1u32);
        for i in 2..=n {
            product *= i;
        }
        product
    }
}

impl ResourceAccessor for CpuComputer {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::CpuCompute
    }

    fn access(&mut self, config: &WorkloadConfig) -> Result<AccessOutcome, AccessError> {
        let ResourceRef::ProblemSize { n } = &config.resource else {
            return Err(AccessError::Mismatch(format!("{:?}", config.resource)));
        };

        let product = Self::factorial(*n);
        let digits = product.to_str_radix(10);
        let sample = if digits.len() > SAMPLE_DIGITS {
            format!("{}...", &digits[..SAMPLE_DIGITS])
        } else {
            digits
        };

        Ok(AccessOutcome {
            units: product.bits(),
            sample: Some(sample),
        })
    }
}
