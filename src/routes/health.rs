// src/routes/health.rs
//! Liveness endpoint for the ApimHealthCheck function.
//!
//! This module defines the route the Functions host forwards `Alive` requests
//! to. It is a sibling module in the `routes` directory and follows the
//! Explicit Module Boundary Pattern (EMBP):
//! - Internal to this file: the handler, query type and status assembly
//! - Exports to the gateway (`mod.rs`): a subrouter containing the route
//!
//! The endpoint always answers `200 OK`. Telemetry probes that fail are
//! logged as warnings and reported as `-1`, so an upstream monitor can rely on
//! the status code alone as a liveness signal.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{or_unavailable, SERVICE_NAME, SERVICE_VERSION, STATUS_HEALTHY};
use crate::{Config, HealthStatus, SystemStatus, Telemetry};

// ---

/// Query parameters accepted by the health check.
#[derive(Debug, Default, Deserialize)]
struct HealthQuery {
    echo: Option<String>,
}

/// Create a subrouter mounting the health check at `route` for GET and POST.
pub fn router(route: &str) -> Router<(Config, Telemetry)> {
    // ---
    Router::new().route(route, get(handler).post(handler))
}

/// Handle `GET|POST <route>`.
///
/// A query string that fails to decode is treated as if `echo` were absent.
async fn handler(
    query: Result<Query<HealthQuery>, QueryRejection>,
    State((config, telemetry)): State<(Config, Telemetry)>,
) -> Json<HealthStatus> {
    // ---
    let query = match query {
        Ok(Query(q)) => q,
        Err(e) => {
            debug!("Ignoring undecodable query string: {}", e);
            HealthQuery::default()
        }
    };

    Json(collect_status(&config, &telemetry, query.echo))
}

/// Assemble a fresh [`HealthStatus`], sampling both probes.
fn collect_status(config: &Config, telemetry: &Telemetry, echo: Option<String>) -> HealthStatus {
    // ---
    info!(echo = echo.as_deref(), "Health check triggered");

    let memory = telemetry.memory.sample();
    if let Err(e) = &memory {
        warn!(probe = telemetry.memory.name(), error = %e, "Failed to read available memory");
    }

    let disk = telemetry.disk.sample();
    if let Err(e) = &disk {
        warn!(error = %e, "Failed to read free disk space");
    }

    HealthStatus {
        status: STATUS_HEALTHY,
        timestamp: Utc::now(),
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        region: config.region.clone(),
        echo: echo.unwrap_or_default(),
        system: SystemStatus {
            os_version: telemetry.host.os_version.clone(),
            platform: telemetry.host.platform,
            free_memory_mb: or_unavailable(&memory),
            free_disk_space_gb: or_unavailable(&disk),
        },
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::telemetry::{DiskProbe, HostInfo, MemoryProbe};
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test body.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn broken_telemetry() -> Telemetry {
        // ---
        Telemetry {
            host: HostInfo::detect(),
            memory: MemoryProbe::Linux {
                meminfo: PathBuf::from("/nonexistent/meminfo"),
            },
            disk: DiskProbe::new(PathBuf::from("/nonexistent/root")),
        }
    }

    fn collect_with_logs(config: &Config, telemetry: &Telemetry) -> (HealthStatus, String) {
        // ---
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let status = tracing::subscriber::with_default(subscriber, || {
            collect_status(config, telemetry, None)
        });
        (status, logs.contents())
    }

    #[test]
    fn test_probe_failures_become_sentinels_and_warn() {
        // ---
        let (status, logs) = collect_with_logs(&Config::default(), &broken_telemetry());

        assert_eq!(status.status, "healthy");
        assert_eq!(status.system.free_memory_mb, -1);
        assert_eq!(status.system.free_disk_space_gb, -1);

        assert!(logs.contains("Health check triggered"));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Failed to read available memory"));
        assert!(logs.contains("Failed to read free disk space"));
    }

    #[test]
    fn test_region_and_echo_pass_through() {
        // ---
        let config = Config {
            region: "eastus".to_string(),
            ..Config::default()
        };
        let status = collect_status(&config, &broken_telemetry(), Some("hello".to_string()));

        assert_eq!(status.region, "eastus");
        assert_eq!(status.echo, "hello");
        assert_eq!(status.service, "ApimHealthCheck");
        assert_eq!(status.version, "1.0.0");
    }

    #[test]
    fn test_missing_echo_is_empty() {
        // ---
        let status = collect_status(&Config::default(), &broken_telemetry(), None);
        assert_eq!(status.echo, "");
        assert_eq!(status.region, "unknown");
    }

    #[test]
    fn test_unsupported_platform_reports_sentinel() {
        // ---
        let telemetry = Telemetry {
            memory: MemoryProbe::Unsupported { platform: "macos" },
            ..broken_telemetry()
        };
        let (status, logs) = collect_with_logs(&Config::default(), &telemetry);

        assert_eq!(status.system.free_memory_mb, -1);
        assert!(logs.contains("not supported on platform 'macos'"));
    }
}
