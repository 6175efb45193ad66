//! Build driver for the BBL firmware projects.
//!
//! Structure:
//! - `bbl` - the three BBL project descriptors and the configure/build logic
//! - `kernel` - installed-kernel path resolution (payload providers)
//! - `toolchain` - SDK binutils resolution and host checks
//! - `vendor` - riscv-pk source fetching (branch per target)
//! - `make` - configure/make process invocation
//! - `prompt` - operator confirmation
//! - `config` - JSON config file
//! - `target` - cross-compilation target selector

pub mod bbl;
pub mod config;
pub mod kernel;
pub mod make;
pub mod prompt;
pub mod target;
pub mod toolchain;
pub mod vendor;

use crate::builder::target::CrossTarget;
use clap::Subcommand;

/// Build commands for the CLI.
#[derive(Subcommand)]
pub enum BuildCommands {
    /// Build and install the BBL firmware for a target
    Build {
        /// Cross-compilation target
        #[arg(value_enum)]
        target: CrossTarget,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Fetch the riscv-pk branch for a target (or every branch)
    Fetch {
        #[arg(value_enum)]
        target: Option<CrossTarget>,
    },
    /// Show source cache status
    Status,
    /// Clean cached sources
    Clean {
        #[arg(value_enum)]
        target: Option<CrossTarget>,
    },
    /// List the BBL project descriptors
    Targets,
    /// Check that host tools and SDK paths are available
    Doctor,
}
