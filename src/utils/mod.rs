//! Utility functions and helpers.
//!
//! # Submodules
//!
//! - [`exec`]: External command invocation with logged output
//! - [`hash`]: Path fingerprinting

/// External command invocation with output captured into the run log
pub mod exec;
/// Fingerprint computation for files and directories
pub mod hash;

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Returns true if `path` exists, is a regular file, and has any execute
/// bit set. Handlers use this to self-check their required executable.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Returns true if `path` exists and is a directory.
#[must_use]
pub fn is_dir(path: &Path) -> bool {
    path.is_dir()
}
