// src/runtime/mod.rs
//! Scheduler hosting the control surface
//!
//! # Architecture
//!
//! ```text
//! ┌──────────── current_thread runtime (1 thread) ────────────┐
//! │  conn task A: GET /block/disk ──▶ WorkloadRunner::run()   │
//! │                                   (holds the thread)      │
//! │  conn task B: GET /             ──▶ waits                 │
//! │  conn task C: GET /non-blocking ──▶ waits                 │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! With `isolate_workloads`, task A hands the run to the blocking pool
//! and B and C are answered immediately.

pub mod scheduler;

pub use scheduler::build_runtime;
