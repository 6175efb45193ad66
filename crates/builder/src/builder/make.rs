//! Process invocation for the configure/make build steps.

use crate::builder::toolchain::{self, ToolRole};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run `../configure` in an out-of-tree build directory.
pub fn run_configure(build_dir: &Path, args: &[String], env: &[(ToolRole, PathBuf)]) -> Result<()> {
    let mut cmd = Command::new("../configure");
    cmd.args(args).current_dir(build_dir);
    apply_env(&mut cmd, env);

    let status = cmd.status().context("Failed to run configure")?;
    if !status.success() {
        bail!("configure failed");
    }
    Ok(())
}

/// Run make in the build directory with the same tool overrides.
pub fn run_make(build_dir: &Path, args: &[&str], env: &[(ToolRole, PathBuf)]) -> Result<()> {
    let mut cmd = Command::new("make");
    cmd.args(args).current_dir(build_dir);
    apply_env(&mut cmd, env);

    let status = cmd.status().context("Failed to run make")?;
    if !status.success() {
        bail!("make failed");
    }
    Ok(())
}

fn apply_env(cmd: &mut Command, env: &[(ToolRole, PathBuf)]) {
    for (role, path) in env {
        cmd.env(role.env_var(), path);
    }
    cmd.env("CFLAGS", toolchain::CFLAGS);
    cmd.env("LDFLAGS", toolchain::LDFLAGS);
}

pub fn cpus() -> String {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
        .to_string()
}
