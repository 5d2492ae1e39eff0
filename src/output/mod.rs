//! Console output and the failure reporter.
//!
//! Routine messages go to stderr in the usual dimmed-green/bold-red
//! scheme. When a handler reports a failure the full run log is replayed
//! to stderr so the operator sees the failing command's output without
//! hunting for the log file.

use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only warnings and errors.
    Quiet = 0,
    /// Default verbosity level.
    Normal = 1,
    /// Show verbose messages in addition to standard output.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints a success message in green (respects quiet mode).
pub fn success(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.green());
}

/// Prints an informational message (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Replays the entire run log to stderr.
///
/// Called on every per-path handler failure, not once per run, so a
/// failure is visible the moment it happens; several failures in one run
/// will repeat earlier log content.
pub fn dump_log(path: &Path) {
    let mut file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error(&format!("Cannot open run log {}: {e}", path.display()));
            return;
        }
    };

    let stderr = io::stderr();
    let mut out = stderr.lock();
    let mut buf = [0u8; 65536];
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if out.write_all(&buf[..n]).is_err() {
                    return;
                }
            }
            Err(e) => {
                error(&format!("Error reading run log: {e}"));
                return;
            }
        }
    }
    let _ = out.flush();
}
