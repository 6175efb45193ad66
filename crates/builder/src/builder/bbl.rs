//! The BBL firmware projects.
//!
//! BBL (riscv-pk) wraps a kernel image as its payload and boots it from
//! M-mode. It builds with a GCC-style configure/make and GNU objcopy, so
//! the configure arguments and tool overrides are assembled here rather
//! than by the usual clang-driven project setup.

use crate::builder::config::Config;
use crate::builder::kernel::KernelProvider;
use crate::builder::target::CrossTarget;
use crate::builder::{make, prompt, toolchain, vendor};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Asked before building; OpenSBI is the recommended firmware.
pub const CONFIRM_BUILD: &str =
    "Are you sure you want to build BBL? OpenSBI works much better with QEMU";

/// Payload load offset. Capability tag bits are only backed above this
/// physical address.
pub const MEM_START: &str = "0xc0000000";

/// The three BBL project descriptors, in `targets` listing order.
pub const VARIANTS: &[BblVariant] = &[
    BblVariant::FreeBsd,
    BblVariant::FreeBsdWithDefaultOptions,
    BblVariant::CheriBsd,
];

/// One BBL project: a target name, the kernel build supplying the payload,
/// and the cross targets it serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BblVariant {
    FreeBsd,
    FreeBsdWithDefaultOptions,
    CheriBsd,
}

impl BblVariant {
    pub fn target_name(self) -> &'static str {
        match self {
            Self::FreeBsd => "bbl-freebsd",
            Self::FreeBsdWithDefaultOptions => "bbl-freebsd-with-default-options",
            Self::CheriBsd => "bbl-cheribsd",
        }
    }

    pub fn kernel_provider(self) -> KernelProvider {
        match self {
            Self::FreeBsd => KernelProvider::FreeBsd,
            Self::FreeBsdWithDefaultOptions => KernelProvider::FreeBsdWithDefaultOptions,
            Self::CheriBsd => KernelProvider::CheriBsd,
        }
    }

    pub fn supported_targets(self) -> &'static [CrossTarget] {
        match self {
            Self::FreeBsd => &[CrossTarget::FreeBsdRiscv64],
            Self::FreeBsdWithDefaultOptions => &[CrossTarget::FreeBsdWithDefaultOptionsRiscv64],
            Self::CheriBsd => &[
                CrossTarget::CheriBsdRiscv64,
                CrossTarget::CheriBsdRiscv64Purecap,
            ],
        }
    }

    /// The unique project serving a cross target.
    pub fn for_target(target: CrossTarget) -> BblVariant {
        match target {
            CrossTarget::FreeBsdRiscv64 => Self::FreeBsd,
            CrossTarget::FreeBsdWithDefaultOptionsRiscv64 => Self::FreeBsdWithDefaultOptions,
            CrossTarget::CheriBsdRiscv64 | CrossTarget::CheriBsdRiscv64Purecap => Self::CheriBsd,
        }
    }

    /// Prerequisite build targets: the payload kernel, and gdb-native for
    /// its GNU objcopy.
    pub fn dependencies(self, target: CrossTarget) -> Vec<String> {
        vec![
            self.kernel_provider().kernel_target(target),
            "gdb-native".to_string(),
        ]
    }
}

/// Configure arguments for a target and payload, in invocation order.
pub fn configure_args(target: CrossTarget, kernel_path: &Path) -> Vec<String> {
    let abi = if target.is_purecap() {
        "--with-abi=l64pc128"
    } else {
        "--with-abi=lp64"
    };
    let arch = if target.is_cheribsd() {
        "--with-arch=rv64imafdcxcheri"
    } else {
        "--with-arch=rv64imafdc"
    };
    vec![
        abi.to_string(),
        arch.to_string(),
        format!("--with-payload={}", kernel_path.display()),
        format!("--with-mem-start={MEM_START}"),
    ]
}

/// Where `make install` leaves the firmware image.
pub fn installed_bbl_path(config: &Config, target: CrossTarget) -> PathBuf {
    BblVariant::for_target(target)
        .kernel_provider()
        .rootfs_dir(config, target)
        .join(target.triple())
        .join("bin")
        .join("bbl")
}

/// Result of a build request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Built,
    Skipped,
}

/// Confirm with the operator, then configure, compile and install BBL.
pub fn build(config: &Config, target: CrossTarget, assume_yes: bool) -> Result<Outcome> {
    build_with_gate(config, target, || {
        if assume_yes {
            Ok(true)
        } else {
            prompt::query_yes_no(CONFIRM_BUILD, false)
        }
    })
}

fn build_with_gate(
    config: &Config,
    target: CrossTarget,
    gate: impl FnOnce() -> Result<bool>,
) -> Result<Outcome> {
    let variant = BblVariant::for_target(target);

    if !gate()? {
        println!("Skipping {}", variant.target_name());
        return Ok(Outcome::Skipped);
    }

    println!("=== Building {} for {} ===", variant.target_name(), target.id());

    let src = vendor::require(config, target)?;
    let kernel = variant.kernel_provider().require_kernel(config, target)?;

    let build_dir = src.join("build");
    std::fs::create_dir_all(&build_dir)?;

    let install_root = variant.kernel_provider().rootfs_dir(config, target);
    let invocation = vec![
        format!("--host={}", target.triple()),
        format!("--prefix={}", install_root.display()),
    ];
    let args = [invocation, configure_args(target, &kernel)].concat();
    let env = toolchain::configure_env(config);

    make::run_configure(&build_dir, &args, &env)?;
    make::run_make(&build_dir, &["-j", &make::cpus(), "bbl"], &env)?;
    make::run_make(&build_dir, &["install"], &env)?;

    println!("  Installed: {}", installed_bbl_path(config, target).display());
    println!("  Finished: {}", chrono::Utc::now().to_rfc3339());
    Ok(Outcome::Built)
}

/// Show which targets have an installed firmware image.
pub fn firmware_status(config: &Config) {
    println!("\nFirmware:\n");
    for &target in CrossTarget::ALL {
        let path = installed_bbl_path(config, target);
        if path.exists() {
            println!("  {:38} [built] {}", target.id(), path.display());
        } else {
            println!("  {:38} [missing]", target.id());
        }
    }
}

/// Print the three descriptors with their targets, dependencies and
/// install locations.
pub fn list_targets(config: &Config) {
    for variant in VARIANTS {
        println!("{}", variant.target_name());
        for &target in variant.supported_targets() {
            println!("  {}", target.id());
            println!("    needs:    {}", variant.dependencies(target).join(", "));
            println!(
                "    installs: {}",
                installed_bbl_path(config, target).display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(target: CrossTarget) -> Vec<String> {
        configure_args(target, Path::new("/build/rootfs/boot/kernel/kernel"))
    }

    fn missing_paths_config(dir: &Path) -> Config {
        Config {
            output_root: dir.join("missing-output"),
            sdk_root: dir.join("missing-sdk"),
            vendor_dir: dir.join("missing-vendor"),
        }
    }

    #[test]
    fn purecap_selects_the_hybrid_abi() {
        let args = args_for(CrossTarget::CheriBsdRiscv64Purecap);
        assert!(args.contains(&"--with-abi=l64pc128".to_string()));
        assert!(!args.contains(&"--with-abi=lp64".to_string()));
    }

    #[test]
    fn other_targets_select_the_plain_abi() {
        for &target in CrossTarget::ALL {
            if target.is_purecap() {
                continue;
            }
            let args = args_for(target);
            assert!(args.contains(&"--with-abi=lp64".to_string()));
            assert!(!args.contains(&"--with-abi=l64pc128".to_string()));
        }
    }

    #[test]
    fn cheribsd_targets_enable_the_cheri_extension() {
        for &target in CrossTarget::ALL {
            let args = args_for(target);
            if target.is_cheribsd() {
                assert!(args.contains(&"--with-arch=rv64imafdcxcheri".to_string()));
            } else {
                assert!(args.contains(&"--with-arch=rv64imafdc".to_string()));
                assert!(!args.iter().any(|a| a.contains("xcheri")));
            }
        }
    }

    #[test]
    fn exactly_one_abi_and_one_arch_argument() {
        for &target in CrossTarget::ALL {
            let args = args_for(target);
            assert_eq!(args.iter().filter(|a| a.starts_with("--with-abi=")).count(), 1);
            assert_eq!(args.iter().filter(|a| a.starts_with("--with-arch=")).count(), 1);
        }
    }

    #[test]
    fn payload_argument_carries_the_resolver_path_verbatim() {
        let config = Config::default();
        let target = CrossTarget::CheriBsdRiscv64;
        let kernel = BblVariant::for_target(target)
            .kernel_provider()
            .installed_kernel_path(&config, target);
        let args = configure_args(target, &kernel);
        assert!(args.contains(&format!("--with-payload={}", kernel.display())));
    }

    #[test]
    fn mem_start_is_fixed_across_variants() {
        for &target in CrossTarget::ALL {
            assert!(args_for(target).contains(&"--with-mem-start=0xc0000000".to_string()));
        }
    }

    #[test]
    fn variant_names_are_distinct_and_target_sets_disjoint() {
        for (i, a) in VARIANTS.iter().enumerate() {
            assert!(!a.supported_targets().is_empty());
            for b in &VARIANTS[i + 1..] {
                assert_ne!(a.target_name(), b.target_name());
                for t in a.supported_targets() {
                    assert!(!b.supported_targets().contains(t));
                }
            }
        }
    }

    #[test]
    fn every_target_resolves_to_the_variant_that_lists_it() {
        for &target in CrossTarget::ALL {
            let variant = BblVariant::for_target(target);
            assert!(variant.supported_targets().contains(&target));
        }
    }

    #[test]
    fn dependencies_name_the_kernel_build_and_gdb_native() {
        let deps = BblVariant::CheriBsd.dependencies(CrossTarget::CheriBsdRiscv64Purecap);
        assert_eq!(deps, ["cheribsd-riscv64-purecap", "gdb-native"]);

        let deps = BblVariant::FreeBsdWithDefaultOptions
            .dependencies(CrossTarget::FreeBsdWithDefaultOptionsRiscv64);
        assert_eq!(deps, ["freebsd-with-default-options-riscv64", "gdb-native"]);
    }

    #[test]
    fn declined_gate_invokes_no_collaborators() {
        // Every path in this config is missing, so touching any collaborator
        // would fail; a declined gate must return before reaching them.
        let dir = tempfile::tempdir().unwrap();
        let config = missing_paths_config(dir.path());
        let outcome =
            build_with_gate(&config, CrossTarget::CheriBsdRiscv64, || Ok(false)).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[test]
    fn affirmed_gate_proceeds_to_the_source_check() {
        let dir = tempfile::tempdir().unwrap();
        let config = missing_paths_config(dir.path());
        let err =
            build_with_gate(&config, CrossTarget::CheriBsdRiscv64, || Ok(true)).unwrap_err();
        assert!(err.to_string().contains("bblbuild fetch"));
    }

    #[test]
    fn installed_firmware_path_is_inside_the_target_rootfs() {
        let config = Config::default();
        assert_eq!(
            installed_bbl_path(&config, CrossTarget::FreeBsdRiscv64),
            Path::new("output/rootfs-freebsd-riscv64/riscv64-unknown-freebsd/bin/bbl")
        );
        assert_eq!(
            installed_bbl_path(&config, CrossTarget::CheriBsdRiscv64Purecap),
            Path::new("output/rootfs-cheribsd-riscv64-purecap/riscv64c-unknown-freebsd/bin/bbl")
        );
    }
}
