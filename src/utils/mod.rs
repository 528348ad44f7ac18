// src/utils/mod.rs
//! Shared utilities: configuration and error types

pub mod config;
pub mod errors;

pub use self::config::{HarnessConfig, LogFormat, RuntimeFlavor};
pub use errors::{HarnessError, Result};
