// src/utils/config.rs
//! Harness configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file (`loopstall.toml`, or the path in `LOOPSTALL_CONFIG`), then
//! environment variables such as `LOOPSTALL__SERVER__PORT=3001`.

use crate::utils::errors::{HarnessError, Result};
use crate::workload::{WorkloadConfig, WorkloadKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "LOOPSTALL_CONFIG";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "LOOPSTALL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub server: ServerConfig,
    pub runtime: RuntimeConfig,
    pub disk: DiskConfig,
    pub network: NetworkConfig,
    pub cpu: CpuConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Run workloads on the blocking pool instead of the runtime thread
    pub isolate_workloads: bool,

    /// Accept `path=` and `url=` on `/block/*`
    ///
    /// Off by default. When on, any client that reaches the port can learn
    /// whether a server-side file exists and how large it is, and can make
    /// the server fetch an arbitrary URL. Only enable it on a loopback bind.
    pub allow_resource_overrides: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            isolate_workloads: false,
            allow_resource_overrides: false,
        }
    }
}

/// Scheduler hosting the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFlavor {
    /// One cooperative thread, the setting under study
    CurrentThread,
    MultiThread,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub flavor: RuntimeFlavor,

    /// Worker threads for `multi_thread`
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            flavor: RuntimeFlavor::CurrentThread,
            worker_threads: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub path: PathBuf,
    pub repeat_count: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("large_dummy_file.dat"),
            repeat_count: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub url: String,
    pub expected_latency_ms: u64,

    /// Per-call transport timeout; unset waits indefinitely
    pub timeout_ms: Option<u64>,

    pub repeat_count: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            url: "http://httpstat.us/200?sleep=5000".to_string(),
            expected_latency_ms: 5000,
            timeout_ms: None,
            repeat_count: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// `n` in `n!`
    pub problem_size: u64,
    pub repeat_count: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            problem_size: 50_000,
            repeat_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl HarnessConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "loopstall".to_string());
        Self::load_from(&path)
    }

    /// Load from `path` (extension optional, file optional) and the environment
    pub fn load_from(path: &str) -> Result<Self> {
        let config: HarnessConfig = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate values the control surface depends on
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HarnessError::ConfigError("server port cannot be 0".into()));
        }
        if self.runtime.flavor == RuntimeFlavor::MultiThread && self.runtime.worker_threads == 0 {
            return Err(HarnessError::ConfigError(
                "multi_thread runtime needs at least one worker".into(),
            ));
        }

        for kind in [
            WorkloadKind::DiskRead,
            WorkloadKind::NetworkCall,
            WorkloadKind::CpuCompute,
        ] {
            self.workload(kind)
                .validate()
                .map_err(|e| HarnessError::ConfigError(format!("[{}] {}", kind.as_str(), e)))?;
        }

        Ok(())
    }

    /// Default workload of `kind` as configured
    pub fn workload(&self, kind: WorkloadKind) -> WorkloadConfig {
        match kind {
            WorkloadKind::DiskRead => {
                WorkloadConfig::disk_read(self.disk.path.clone(), self.disk.repeat_count)
            }
            WorkloadKind::NetworkCall => {
                let config = WorkloadConfig::network_call(
                    self.network.url.clone(),
                    Duration::from_millis(self.network.expected_latency_ms),
                    self.network.repeat_count,
                );
                match self.network.timeout_ms {
                    Some(ms) => config.with_timeout(Duration::from_millis(ms)),
                    None => config,
                }
            }
            WorkloadKind::CpuCompute => {
                WorkloadConfig::cpu_compute(self.cpu.problem_size, self.cpu.repeat_count)
            }
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
