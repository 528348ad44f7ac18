// src/server/mod.rs
//! HTTP control surface
//!
//! - **Router**: path and query handling
//! - **Handlers**: endpoint bodies, including the blocking triggers
//! - **HTTP Server**: hyper accept loop
//!
//! # Endpoints
//!
//! ```text
//! GET /                  liveness
//! GET /non-blocking      instant answer
//! GET /block/{kind}      disk | network | cpu, ?repeat=&size=&path=&url=&format=json
//! GET /metrics           Prometheus text
//! ```
//!
//! `path=` and `url=` are refused unless `server.allow_resource_overrides`
//! is set; with it set, do not expose the port beyond loopback.

pub mod handlers;
pub mod http_server;
pub mod router;

// Re-export commonly used types
pub use handlers::AppState;
pub use http_server::ControlServer;
pub use router::{ResponseFormat, Route, WorkloadOverrides};
