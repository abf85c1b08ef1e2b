// src/arch.rs

//! Architecture tags as they appear in repodata file names
//!
//! Index files are named `<arch>-repodata`, where `<arch>` follows the
//! kernel machine name with a `-musl` suffix for musl-based systems
//! (`x86_64`, `x86_64-musl`, `aarch64`, `armv7l`, `i686`, ...).

/// Longest architecture tag accepted from an index file name
pub const MAX_ARCH_LEN: usize = 63;

/// Architecture of the running system, in repodata naming
pub fn native() -> String {
    let machine = match std::env::consts::ARCH {
        "x86" => "i686",
        "arm" => "armv7l",
        "powerpc" => "ppc",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        other => other,
    };

    if cfg!(target_env = "musl") {
        format!("{}-musl", machine)
    } else {
        machine.to_string()
    }
}

/// Check that an architecture tag taken from a file name is usable
pub fn is_valid(arch: &str) -> bool {
    !arch.is_empty() && arch.len() <= MAX_ARCH_LEN && !arch.contains('/')
}
