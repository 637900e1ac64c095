//! Free disk space on the volume holding a configured root path.
//!
//! The path itself is queried (`statvfs` on Unix, `GetDiskFreeSpaceExW` on
//! Windows), so tmpfs and overlay roots report their own volume.

use std::path::{Path, PathBuf};

use super::ProbeError;

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DiskProbe {
    root: PathBuf,
}

impl DiskProbe {
    pub fn new(root: PathBuf) -> Self {
        DiskProbe { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Space available to this process on the root's volume, in gigabytes.
    pub fn sample(&self) -> Result<u64, ProbeError> {
        // ---
        fs2::available_space(&self.root)
            .map(|bytes| bytes / BYTES_PER_GB)
            .map_err(|source| ProbeError::RootUnavailable {
                path: self.root.clone(),
                source,
            })
    }
}
