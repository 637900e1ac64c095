//! Available-memory probe.
//!
//! Linux reads `MemAvailable:` from `/proc/meminfo`; Windows asks the OS
//! through `sysinfo`; every other platform reports
//! [`ProbeError::UnsupportedPlatform`] instead of silently falling through.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::ProbeError;
use crate::Config;

const MEM_AVAILABLE: &str = "MemAvailable:";

/// Memory sampling strategy, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub enum MemoryProbe {
    Linux { meminfo: PathBuf },
    Windows,
    Unsupported { platform: &'static str },
}

impl MemoryProbe {
    /// Pick the strategy matching the compile target.
    pub fn detect(config: &Config) -> Self {
        // ---
        Self::for_platform(std::env::consts::OS, config)
    }

    fn for_platform(os: &'static str, config: &Config) -> Self {
        // ---
        match os {
            "linux" => MemoryProbe::Linux {
                meminfo: config.meminfo_path.clone(),
            },
            "windows" => MemoryProbe::Windows,
            other => MemoryProbe::Unsupported { platform: other },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MemoryProbe::Linux { .. } => "linux-meminfo",
            MemoryProbe::Windows => "windows",
            MemoryProbe::Unsupported { .. } => "unsupported",
        }
    }

    /// Available memory in megabytes.
    pub fn sample(&self) -> Result<u64, ProbeError> {
        // ---
        match self {
            MemoryProbe::Linux { meminfo } => read_meminfo(meminfo),
            MemoryProbe::Windows => sample_system_memory(),
            MemoryProbe::Unsupported { platform } => Err(ProbeError::UnsupportedPlatform(*platform)),
        }
    }
}

fn read_meminfo(path: &Path) -> Result<u64, ProbeError> {
    // ---
    let contents = fs::read_to_string(path).map_err(|source| ProbeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_mem_available(&contents)?.ok_or_else(|| ProbeError::MissingField {
        path: path.to_path_buf(),
        field: MEM_AVAILABLE,
    })
}

/// Extract `MemAvailable:` from meminfo text and convert kB to MB.
///
/// Returns `Ok(None)` when no such line exists.
fn parse_mem_available(contents: &str) -> Result<Option<u64>, ProbeError> {
    // ---
    let Some(line) = contents.lines().find(|l| l.starts_with(MEM_AVAILABLE)) else {
        return Ok(None);
    };

    let raw = line.split_whitespace().nth(1).unwrap_or_default();
    let kb = raw.parse::<u64>().map_err(|_| ProbeError::Parse {
        field: MEM_AVAILABLE,
        value: raw.to_string(),
    })?;

    Ok(Some(kb / 1024))
}

fn sample_system_memory() -> Result<u64, ProbeError> {
    // ---
    let sys = System::new_with_specifics(
        RefreshKind::new().with_memory(MemoryRefreshKind::new().with_ram()),
    );
    system_memory_mb(sys.total_memory(), sys.available_memory())
}

/// Convert byte counts from the OS to MB; a zero total means the read failed.
fn system_memory_mb(total_bytes: u64, available_bytes: u64) -> Result<u64, ProbeError> {
    // ---
    if total_bytes == 0 {
        return Err(ProbeError::NoMemoryReported);
    }
    Ok(available_bytes / (1024 * 1024))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
MemTotal:       16318412 kB
MemFree:         1203344 kB
MemAvailable:    8391168 kB
Buffers:          402112 kB
";

    fn probe_over(contents: &str) -> (tempfile::NamedTempFile, MemoryProbe) {
        // ---
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let probe = MemoryProbe::Linux {
            meminfo: file.path().to_path_buf(),
        };
        (file, probe)
    }

    #[test]
    fn test_kilobytes_converted_with_integer_division() {
        // ---
        assert_eq!(parse_mem_available(SAMPLE).unwrap(), Some(8194));
        assert_eq!(parse_mem_available("MemAvailable: 2047 kB").unwrap(), Some(1));
        assert_eq!(parse_mem_available("MemAvailable: 1023 kB").unwrap(), Some(0));
    }

    #[test]
    fn test_linux_probe_reads_file() {
        // ---
        let (_file, probe) = probe_over(SAMPLE);
        assert_eq!(probe.sample().unwrap(), 8194);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        // ---
        let probe = MemoryProbe::Linux {
            meminfo: PathBuf::from("/nonexistent/meminfo"),
        };
        assert!(matches!(probe.sample(), Err(ProbeError::Read { .. })));
    }

    #[test]
    fn test_missing_mem_available_line() {
        // ---
        let (_file, probe) = probe_over("MemTotal: 100 kB\nMemFree: 50 kB\n");
        assert!(matches!(
            probe.sample(),
            Err(ProbeError::MissingField { .. })
        ));
    }

    #[test]
    fn test_malformed_value_is_parse_error() {
        // ---
        let (_file, probe) = probe_over("MemAvailable: lots kB\n");
        match probe.sample() {
            Err(ProbeError::Parse { value, .. }) => assert_eq!(value, "lots"),
            other => panic!("expected parse error, got {other:?}"),
        }

        let (_file, probe) = probe_over("MemAvailable:\n");
        assert!(matches!(probe.sample(), Err(ProbeError::Parse { .. })));
    }

    #[test]
    fn test_platform_selection() {
        // ---
        let cfg = Config::default();

        assert_eq!(MemoryProbe::for_platform("linux", &cfg).name(), "linux-meminfo");
        assert_eq!(MemoryProbe::for_platform("windows", &cfg).name(), "windows");

        let mac = MemoryProbe::for_platform("macos", &cfg);
        assert!(matches!(
            mac.sample(),
            Err(ProbeError::UnsupportedPlatform("macos"))
        ));
    }

    #[test]
    fn test_system_memory_without_total_is_unavailable() {
        // ---
        assert!(matches!(
            system_memory_mb(0, 0),
            Err(ProbeError::NoMemoryReported)
        ));
        assert_eq!(system_memory_mb(16 << 30, 3 << 30).unwrap(), 3072);
        assert_eq!(system_memory_mb(16 << 30, (1 << 20) - 1).unwrap(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_real_meminfo_reports_positive_memory() {
        // ---
        let probe = MemoryProbe::detect(&Config::default());
        assert!(probe.sample().unwrap() > 0);
    }
}
