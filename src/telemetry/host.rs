//! Static host facts: OS description and processor architecture.

use sysinfo::System;

#[derive(Debug, Clone)]
pub struct HostInfo {
    // ---
    /// Human-readable OS description, e.g. `Linux 6.1.0-18-amd64`.
    pub os_version: String,

    /// Architecture name, e.g. `X64` or `Arm64`.
    pub platform: &'static str,
}

impl HostInfo {
    pub fn detect() -> Self {
        // ---
        HostInfo {
            os_version: os_description(),
            platform: architecture_name(std::env::consts::ARCH),
        }
    }
}

/// `<kernel name> <kernel release>`, falling back to the long OS name and
/// finally to the compile target OS.
fn os_description() -> String {
    // ---
    match (System::name(), System::kernel_version()) {
        (Some(name), Some(kernel)) => format!("{name} {kernel}"),
        _ => System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
    }
}

/// Map a Rust target architecture to the conventional display name.
fn architecture_name(arch: &'static str) -> &'static str {
    // ---
    match arch {
        "x86_64" => "X64",
        "x86" => "X86",
        "aarch64" => "Arm64",
        "arm" => "Arm",
        "wasm32" => "Wasm",
        "s390x" => "S390x",
        "loongarch64" => "LoongArch64",
        "powerpc64" => "Ppc64le",
        "riscv64" => "RiscV64",
        other => other,
    }
}
