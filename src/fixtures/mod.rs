// src/fixtures/mod.rs
//! Test fixtures for workloads

pub mod dummy_file;

pub use dummy_file::{create_dummy_file, megabytes, MEGABYTE};
