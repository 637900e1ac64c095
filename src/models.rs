//! Response model for the health check.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::telemetry::ProbeError;

// ---

/// Numeric value reported for telemetry that could not be read.
pub const UNAVAILABLE: i64 = -1;

pub const STATUS_HEALTHY: &str = "healthy";
pub const SERVICE_NAME: &str = "ApimHealthCheck";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Body returned by every health check request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    // ---
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
    pub region: String,
    pub echo: String,
    pub system: SystemStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    // ---
    pub os_version: String,
    pub platform: &'static str,
    #[serde(rename = "freeMemoryMB")]
    pub free_memory_mb: i64,
    #[serde(rename = "freeDiskSpaceGB")]
    pub free_disk_space_gb: i64,
}

/// Collapse a probe result to the wire value, `-1` on failure.
pub fn or_unavailable(sample: &Result<u64, ProbeError>) -> i64 {
    // ---
    match sample {
        Ok(v) => i64::try_from(*v).unwrap_or(i64::MAX),
        Err(_) => UNAVAILABLE,
    }
}
