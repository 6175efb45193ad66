//! # bblbuild
//!
//! Build the BBL firmware (riscv-pk) with an embedded kernel payload for
//! RISC-V FreeBSD and CheriBSD targets.
//!
//! ## Usage
//!
//! ```bash
//! bblbuild fetch cheribsd-riscv64    # Clone the riscv-pk branch for a target
//! bblbuild build cheribsd-riscv64    # Configure + make + install
//! bblbuild status                    # Show source cache status
//! bblbuild targets                   # List the BBL project descriptors
//! bblbuild doctor                    # Check host tools and SDK paths
//! ```
//!
//! ## Architecture
//!
//! - Firmware: riscv-pk `bbl`, built with configure/make against GNU objcopy
//! - Payload: a kernel image produced by a prior FreeBSD/CheriBSD build

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod builder;

#[derive(Parser)]
#[command(name = "bblbuild", about = "BBL firmware builder for FreeBSD and CheriBSD RISC-V targets")]
struct Cli {
    /// Config file path (default: bblbuild.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: builder::BuildCommands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = builder::config::Config::load(cli.config.as_deref())?;

    match cli.command {
        builder::BuildCommands::Build { target, yes } => {
            builder::bbl::build(&config, target, yes)?;
        }
        builder::BuildCommands::Fetch { target } => {
            if let Some(target) = target {
                builder::vendor::fetch(&config, target)?;
            } else {
                builder::vendor::fetch_all(&config)?;
            }
        }
        builder::BuildCommands::Status => {
            builder::vendor::status(&config)?;
            builder::bbl::firmware_status(&config);
        }
        builder::BuildCommands::Clean { target } => builder::vendor::clean(&config, target)?,
        builder::BuildCommands::Targets => builder::bbl::list_targets(&config),
        builder::BuildCommands::Doctor => builder::toolchain::doctor(&config)?,
    }

    Ok(())
}
