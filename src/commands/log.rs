//! Print the persistent run log.

use crate::output;
use anyhow::{Context, Result};
use std::io::Write;

/// Dump the run log to stdout.
///
/// # Errors
///
/// Returns an error if an existing log file cannot be read.
pub fn execute() -> Result<()> {
    let path = crate::log_file_path();
    if !path.exists() {
        output::info("No run log yet");
        return Ok(());
    }

    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read run log {}", path.display()))?;
    std::io::stdout().write_all(&content)?;
    Ok(())
}
