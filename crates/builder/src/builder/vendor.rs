//! riscv-pk source management (fetch, cache, clean).
//!
//! One upstream, two branches: the purecap target builds from the
//! `cheri_purecap` branch in its own tree, everything else from `cheri`.

#![allow(clippy::cast_precision_loss)] // Checkout sizes don't need u64 precision for display

use crate::builder::config::Config;
use crate::builder::target::CrossTarget;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub const RISCV_PK_URL: &str = "https://github.com/CTSRD-CHERI/riscv-pk.git";

/// Checkout definitions: (directory name, branch).
pub const CHECKOUTS: &[(&str, &str)] = &[
    ("riscv-pk", "cheri"),
    ("riscv-pk-purecap", "cheri_purecap"),
];

/// Branch for a cross target.
pub fn branch_for(target: CrossTarget) -> &'static str {
    if target.is_purecap() {
        "cheri_purecap"
    } else {
        "cheri"
    }
}

/// Checkout directory name for a cross target.
pub fn checkout_name(target: CrossTarget) -> &'static str {
    if target.is_purecap() {
        "riscv-pk-purecap"
    } else {
        "riscv-pk"
    }
}

fn checkout_dir(config: &Config, target: CrossTarget) -> PathBuf {
    config.vendor_dir.join(checkout_name(target))
}

/// Get the source path for a target, failing if not cached.
pub fn require(config: &Config, target: CrossTarget) -> Result<PathBuf> {
    let path = checkout_dir(config, target);
    if !path.exists() {
        bail!("riscv-pk not found. Run: bblbuild fetch {}", target.id());
    }
    Ok(path)
}

/// Fetch the source branch for a target.
pub fn fetch(config: &Config, target: CrossTarget) -> Result<()> {
    let dest = checkout_dir(config, target);
    let branch = branch_for(target);

    if dest.exists() {
        println!("{} already cached at {}", checkout_name(target), dest.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config.vendor_dir)?;

    println!("Fetching riscv-pk from {RISCV_PK_URL} @ {branch}...");

    let dest_str = dest
        .to_str()
        .context("Destination path contains invalid UTF-8")?;

    let status = Command::new("git")
        .args(["clone", "--depth", "1", "--branch", branch, RISCV_PK_URL, dest_str])
        .status()
        .context("Failed to run git clone")?;

    if !status.success() {
        bail!("git clone failed for branch {branch}");
    }

    let size = dir_size(&dest)?;
    println!(
        "  Cached: {} ({:.1} MB)",
        dest.display(),
        size as f64 / 1_000_000.0
    );

    Ok(())
}

/// Fetch every branch a registered target can build from.
pub fn fetch_all(config: &Config) -> Result<()> {
    println!("=== Fetching sources ===\n");
    for &target in CrossTarget::ALL {
        fetch(config, target)?;
    }
    Ok(())
}

/// Show cache status for both checkouts.
pub fn status(config: &Config) -> Result<()> {
    println!("Cache Status:\n");

    let mut total_size: u64 = 0;
    let mut cached = 0;

    for (name, branch) in CHECKOUTS {
        let path = config.vendor_dir.join(name);
        if path.exists() {
            let size = dir_size(&path)?;
            total_size += size;
            cached += 1;
            println!("  {name:18} [cached] {:.1} MB", size as f64 / 1_000_000.0);
        } else {
            println!("  {name:18} [missing] {RISCV_PK_URL} @ {branch}");
        }
    }

    println!();
    println!(
        "  Total: {}/{} cached ({:.1} MB)",
        cached,
        CHECKOUTS.len(),
        total_size as f64 / 1_000_000.0
    );

    Ok(())
}

/// Clean cached sources for one target, or everything.
pub fn clean(config: &Config, target: Option<CrossTarget>) -> Result<()> {
    if let Some(target) = target {
        let path = checkout_dir(config, target);
        if path.exists() {
            std::fs::remove_dir_all(&path)?;
            println!("Cleaned: {}", checkout_name(target));
        } else {
            println!("{} not in cache", checkout_name(target));
        }
    } else if config.vendor_dir.exists() {
        std::fs::remove_dir_all(&config.vendor_dir)?;
        println!("Cleaned all cached sources");
    }
    Ok(())
}

/// Directory size in bytes.
fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
    {
        let entry = entry?;
        let meta = entry.metadata()?;
        total += if meta.is_dir() {
            dir_size(&entry.path())?
        } else {
            meta.len()
        };
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purecap_builds_from_its_own_branch_and_tree() {
        assert_eq!(branch_for(CrossTarget::CheriBsdRiscv64Purecap), "cheri_purecap");
        assert_eq!(checkout_name(CrossTarget::CheriBsdRiscv64Purecap), "riscv-pk-purecap");
        assert_eq!(branch_for(CrossTarget::CheriBsdRiscv64), "cheri");
        assert_eq!(checkout_name(CrossTarget::FreeBsdRiscv64), "riscv-pk");
    }

    #[test]
    fn target_mapping_agrees_with_the_checkout_table() {
        for &target in CrossTarget::ALL {
            let name = checkout_name(target);
            let branch = branch_for(target);
            assert!(CHECKOUTS.contains(&(name, branch)));
        }
    }

    #[test]
    fn require_points_at_the_fetch_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            vendor_dir: dir.path().join("vendor"),
            ..Config::default()
        };
        let err = require(&config, CrossTarget::CheriBsdRiscv64).unwrap_err();
        assert!(err.to_string().contains("bblbuild fetch cheribsd-riscv64"));
    }

    #[test]
    fn dir_size_sums_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a"), [0u8; 10]).unwrap();
        std::fs::write(dir.path().join("sub/b"), [0u8; 32]).unwrap();
        assert_eq!(dir_size(dir.path()).unwrap(), 42);
    }
}
