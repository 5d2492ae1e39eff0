//! External command invocation.
//!
//! Handler actions perform their one observable side effect through
//! [`run_logged`]: the child's stdout and stderr are appended to the
//! persistent run log so a failure can be replayed to the operator, and the
//! caller only sees whether the command exited cleanly.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs `bin` with `args`, appending all output to the run log.
///
/// Returns `Ok(true)` when the command exits with status zero. A nonzero
/// exit is `Ok(false)`; only failing to open the log or to spawn the
/// process at all is an `Err`.
///
/// # Errors
///
/// Returns an error if the run log cannot be opened or the process cannot
/// be spawned.
pub fn run_logged(bin: &str, args: &[&str]) -> Result<bool> {
    let mut log = open_run_log(&crate::log_file_path())?;

    writeln!(
        log,
        "[{}] $ {} {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        bin,
        args.join(" ")
    )?;

    let stdout = log.try_clone().context("Failed to clone log handle")?;
    let stderr = log.try_clone().context("Failed to clone log handle")?;

    debug!(bin, ?args, "spawning");
    let status = Command::new(bin)
        .args(args)
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .with_context(|| format!("Failed to spawn {bin}"))?;

    if !status.success() {
        writeln!(log, "[{}] {} exited with {}", Local::now().format("%Y-%m-%d %H:%M:%S"), bin, status)?;
    }

    Ok(status.success())
}

/// Appends a bare line to the run log. Used by the engine for run markers.
pub fn log_line(path: &Path, line: &str) {
    if let Ok(mut log) = open_run_log(path) {
        let _ = writeln!(log, "[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
    }
}

/// Opens the run log for appending, creating it on first use.
fn open_run_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open run log {}", path.display()))
}
