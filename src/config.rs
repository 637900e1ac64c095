//! Configuration loader for the `apim-healthcheck` function.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, the
//! request handler never touches the process environment; it receives a
//! [`Config`] snapshot through router state.
//!
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional `u16` variable through `$lookup`, with a default value.
macro_rules! parse_var_u16 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string variable through `$lookup`, treating empty as unset.
macro_rules! optional_var {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name).filter(|v| !v.is_empty())
    };
}

/// Region reported when `REGION_NAME` is not set.
pub const UNKNOWN_REGION: &str = "unknown";

/// Route the Functions host forwards `Alive` requests to.
pub const DEFAULT_ROUTE: &str = "/api/Alive";

/// Port used when the Functions host does not assign one.
pub const DEFAULT_PORT: u16 = 8080;

/// Linux memory statistics pseudo-file.
pub const DEFAULT_MEMINFO_PATH: &str = "/proc/meminfo";

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Deployment region echoed back in every response.
    pub region: String,

    /// TCP port the custom handler listens on.
    pub port: u16,

    /// Path the health check is mounted at.
    pub route: String,

    /// Source file for the Linux memory probe.
    pub meminfo_path: PathBuf,

    /// Volume root whose free space is reported.
    pub disk_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Config {
            region: UNKNOWN_REGION.to_string(),
            port: DEFAULT_PORT,
            route: DEFAULT_ROUTE.to_string(),
            meminfo_path: PathBuf::from(DEFAULT_MEMINFO_PATH),
            disk_root: default_disk_root(),
        }
    }
}

/// Root volume of the current platform: `C:\` on Windows, `/` elsewhere.
pub fn default_disk_root() -> PathBuf {
    // ---
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}

/// Load configuration from the process environment.
///
/// Optional:
/// - `REGION_NAME` – deployment region (default: `unknown`)
/// - `FUNCTIONS_CUSTOMHANDLER_PORT` – listening port (default: 8080)
/// - `HEALTH_ROUTE` – route path (default: `/api/Alive`)
/// - `MEMINFO_PATH` – Linux memory statistics file (default: `/proc/meminfo`)
/// - `DISK_ROOT` – volume to report free space for (default: `/` or `C:\`)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_from(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
///
/// Tests pass a closure over a fixed map instead of mutating the process
/// environment.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let region = optional_var!(lookup, "REGION_NAME").unwrap_or_else(|| UNKNOWN_REGION.into());
    let port = parse_var_u16!(lookup, "FUNCTIONS_CUSTOMHANDLER_PORT", DEFAULT_PORT);
    let route = optional_var!(lookup, "HEALTH_ROUTE").unwrap_or_else(|| DEFAULT_ROUTE.into());
    let meminfo_path = optional_var!(lookup, "MEMINFO_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMINFO_PATH));
    let disk_root = optional_var!(lookup, "DISK_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(default_disk_root);

    if !route.starts_with('/') {
        return Err(anyhow!("Invalid HEALTH_ROUTE: {route:?} must start with '/'"));
    }

    Ok(Config {
        region,
        port,
        route,
        meminfo_path,
        disk_root,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  REGION_NAME                  : {}", self.region);
        tracing::info!("  FUNCTIONS_CUSTOMHANDLER_PORT : {}", self.port);
        tracing::info!("  HEALTH_ROUTE                 : {}", self.route);
        tracing::info!("  MEMINFO_PATH                 : {}", self.meminfo_path.display());
        tracing::info!("  DISK_ROOT                    : {}", self.disk_root.display());
    }
}
