//! Cross-SDK tool resolution.
//!
//! The BBL build uses objcopy flags the LLVM tool rejects, so OBJCOPY
//! points at the GNU `gobjcopy` installed by the native gdb build. The
//! remaining binutils roles come from the SDK's LLVM tools.

use crate::builder::config::Config;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Tool roles overridden in the configure/make environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolRole {
    Objcopy,
    Readelf,
    Ranlib,
    Archiver,
}

impl ToolRole {
    /// Environment variable the configure script honors.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Objcopy => "OBJCOPY",
            Self::Readelf => "READELF",
            Self::Ranlib => "RANLIB",
            Self::Archiver => "AR",
        }
    }
}

/// Freestanding compile flags for the firmware build.
pub const CFLAGS: &str = "-nostdlib";
/// Link flags; bbl carries its own startup code.
pub const LDFLAGS: &str = "-nostartfiles -nostdlib -static";

/// `bin/` directory of the prebuilt cross SDK.
pub fn sdk_bindir(config: &Config) -> PathBuf {
    config.sdk_root.join("bin")
}

/// `bin/` directory of the native gdb install.
pub fn gdb_native_bindir(config: &Config) -> PathBuf {
    config.output_root.join("gdb-native").join("bin")
}

/// Tool overrides for the configure and make environment, constructed once
/// per build invocation.
pub fn configure_env(config: &Config) -> Vec<(ToolRole, PathBuf)> {
    vec![
        (ToolRole::Objcopy, gdb_native_bindir(config).join("gobjcopy")),
        (ToolRole::Readelf, sdk_bindir(config).join("llvm-readelf")),
        (ToolRole::Ranlib, sdk_bindir(config).join("llvm-ranlib")),
        (ToolRole::Archiver, sdk_bindir(config).join("llvm-ar")),
    ]
}

/// Check that the host tools and SDK paths a build would touch are present.
pub fn doctor(config: &Config) -> Result<()> {
    let mut ok = true;

    for tool in ["make", "git"] {
        if which::which(tool).is_err() {
            eprintln!("[FAIL] missing `{tool}` in PATH");
            ok = false;
        } else {
            eprintln!("[OK] {tool}");
        }
    }

    for (role, path) in configure_env(config) {
        if path.is_file() {
            eprintln!("[OK] {} = {}", role.env_var(), path.display());
        } else {
            eprintln!("[FAIL] missing {}: {}", role.env_var(), path.display());
            ok = false;
        }
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}
