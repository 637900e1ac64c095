//! Host telemetry gateway.
//!
//! Everything that touches the operating system lives below this module:
//! - `memory`: available-memory probe, one strategy per platform
//! - `disk`: free space on the root volume
//! - `host`: static OS description and architecture
//!
//! Probes are chosen once at startup by [`Telemetry::detect`] and return an
//! explicit `Result<u64, ProbeError>`. Turning a failure into the `-1`
//! sentinel is left to the caller, so the contract is visible in the types.

use std::io;
use std::path::PathBuf;

use crate::Config;

mod disk;
mod host;
mod memory;

pub use disk::DiskProbe;
pub use host::HostInfo;
pub use memory::MemoryProbe;

/// Why a probe could not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("memory probe not supported on platform '{0}'")]
    UnsupportedPlatform(&'static str),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no '{field}' entry in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("unparsable value for '{field}': {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("disk root {} is not accessible: {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("operating system reported no physical memory")]
    NoMemoryReported,
}

/// The set of probes and static host facts shared by every request.
#[derive(Debug, Clone)]
pub struct Telemetry {
    // ---
    pub host: HostInfo,
    pub memory: MemoryProbe,
    pub disk: DiskProbe,
}

impl Telemetry {
    /// Select probes for the running platform and capture host facts.
    pub fn detect(config: &Config) -> Self {
        // ---
        let telemetry = Telemetry {
            host: HostInfo::detect(),
            memory: MemoryProbe::detect(config),
            disk: DiskProbe::new(config.disk_root.clone()),
        };

        tracing::info!(
            os = %telemetry.host.os_version,
            platform = telemetry.host.platform,
            memory_probe = telemetry.memory.name(),
            disk_root = %telemetry.disk.root().display(),
            "Telemetry probes selected"
        );
        telemetry
    }
}
