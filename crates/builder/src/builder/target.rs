//! Cross-compilation target selection.

use clap::ValueEnum;

/// The cross-compilation targets the BBL projects can serve.
///
/// Only 64-bit RISC-V is supported; the two capability branches are
/// CheriBSD-only (plain FreeBSD has no CHERI hardware support).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CrossTarget {
    /// FreeBSD with the CHERI project's kernel options
    #[value(name = "freebsd-riscv64")]
    FreeBsdRiscv64,
    /// Stock FreeBSD (default kernel options)
    #[value(name = "freebsd-with-default-options-riscv64")]
    FreeBsdWithDefaultOptionsRiscv64,
    /// CheriBSD, hybrid ABI
    #[value(name = "cheribsd-riscv64")]
    CheriBsdRiscv64,
    /// CheriBSD, pure-capability ABI
    #[value(name = "cheribsd-riscv64-purecap")]
    CheriBsdRiscv64Purecap,
}

impl CrossTarget {
    pub const ALL: &'static [CrossTarget] = &[
        CrossTarget::FreeBsdRiscv64,
        CrossTarget::FreeBsdWithDefaultOptionsRiscv64,
        CrossTarget::CheriBsdRiscv64,
        CrossTarget::CheriBsdRiscv64Purecap,
    ];

    /// Stable identifier used in directory names and CLI output.
    pub fn id(self) -> &'static str {
        match self {
            Self::FreeBsdRiscv64 => "freebsd-riscv64",
            Self::FreeBsdWithDefaultOptionsRiscv64 => "freebsd-with-default-options-riscv64",
            Self::CheriBsdRiscv64 => "cheribsd-riscv64",
            Self::CheriBsdRiscv64Purecap => "cheribsd-riscv64-purecap",
        }
    }

    /// Architecture part of the identifier.
    pub fn arch_id(self) -> &'static str {
        if self.is_purecap() {
            "riscv64-purecap"
        } else {
            "riscv64"
        }
    }

    /// GNU host triple passed to configure.
    pub fn triple(self) -> &'static str {
        match self {
            Self::FreeBsdRiscv64 | Self::FreeBsdWithDefaultOptionsRiscv64 | Self::CheriBsdRiscv64 => {
                "riscv64-unknown-freebsd"
            }
            Self::CheriBsdRiscv64Purecap => "riscv64c-unknown-freebsd",
        }
    }

    /// Pure-capability ABI target (all pointers are hardware capabilities).
    pub fn is_purecap(self) -> bool {
        matches!(self, Self::CheriBsdRiscv64Purecap)
    }

    /// Target OS with CHERI hardware support.
    pub fn is_cheribsd(self) -> bool {
        matches!(self, Self::CheriBsdRiscv64 | Self::CheriBsdRiscv64Purecap)
    }
}
