//! Liveness and host telemetry endpoint for the `ApimHealthCheck` function.
//!
//! The library holds everything except process startup so the integration
//! tests can serve the same router the binary does:
//! - `config`: environment-derived settings
//! - `telemetry`: memory, disk and host probes chosen once at startup
//! - `models`: the JSON response shape
//! - `routes`: the axum gateway mounting the health check
//!
//! Modules follow the Explicit Module Boundary Pattern (EMBP): each directory
//! module exposes a small surface from its `mod.rs`, and the most widely
//! used types are re-exported below.

pub mod config;
pub mod models;
pub mod routes;
pub mod telemetry;

pub use config::Config;

// Shared by routes, the binary and the integration tests.
pub use models::{HealthStatus, SystemStatus};
pub use telemetry::{ProbeError, Telemetry};
