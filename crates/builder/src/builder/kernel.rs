//! Installed-kernel path resolution.
//!
//! The BBL payload is the kernel image a previous OS build installed into
//! its rootfs. That build is a declared dependency, so by the time
//! configure runs the image must already exist.

use crate::builder::config::Config;
use crate::builder::target::CrossTarget;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Which OS build supplies the payload kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelProvider {
    FreeBsd,
    FreeBsdWithDefaultOptions,
    CheriBsd,
}

impl KernelProvider {
    fn os_name(self) -> &'static str {
        match self {
            Self::FreeBsd => "freebsd",
            Self::FreeBsdWithDefaultOptions => "freebsd-with-default-options",
            Self::CheriBsd => "cheribsd",
        }
    }

    /// Name of the kernel build target this provider depends on.
    pub fn kernel_target(self, target: CrossTarget) -> String {
        format!("{}-{}", self.os_name(), target.arch_id())
    }

    /// Rootfs tree the kernel build installs into. BBL installs alongside it.
    pub fn rootfs_dir(self, config: &Config, target: CrossTarget) -> PathBuf {
        config
            .output_root
            .join(format!("rootfs-{}", self.kernel_target(target)))
    }

    /// Path of the kernel image inside the rootfs.
    pub fn installed_kernel_path(self, config: &Config, target: CrossTarget) -> PathBuf {
        self.rootfs_dir(config, target).join("boot/kernel/kernel")
    }

    /// Resolve the payload, failing if the kernel build has not run yet.
    pub fn require_kernel(self, config: &Config, target: CrossTarget) -> Result<PathBuf> {
        let path = self.installed_kernel_path(config, target);
        if !path.exists() {
            bail!(
                "Kernel image {} not found. Build {} first",
                path.display(),
                self.kernel_target(target)
            );
        }
        Ok(path)
    }
}
