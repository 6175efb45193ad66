//! Build configuration.
//!
//! Paths come from `bblbuild.json` in the working directory (or `--config`).
//! Every field has a default, so the file is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "bblbuild.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for build outputs (target rootfs trees, the gdb-native install).
    pub output_root: PathBuf,
    /// Prebuilt cross-SDK root (LLVM binutils under `bin/`).
    pub sdk_root: PathBuf,
    /// Where source checkouts are cached.
    pub vendor_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            sdk_root: PathBuf::from("output/sdk"),
            vendor_dir: PathBuf::from("vendor"),
        }
    }
}

impl Config {
    /// Load the config file. The default file may be absent; an explicitly
    /// requested one must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}
