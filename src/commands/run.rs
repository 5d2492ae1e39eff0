//! Run all triggers, or a single named trigger.

use crate::context::Context;
use crate::engine::Engine;
use crate::handlers;
use crate::output;
use anyhow::Result;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error for structural failures: missing privileges, an
/// unknown trigger name, unusable state or log directories, or a failed
/// final state write. Per-path handler failures are reported but do not
/// fail the command.
pub fn execute(trigger: Option<&str>, force: bool, dry_run: bool) -> Result<()> {
    // Writing system caches needs root. Relocated state/log directories
    // mean a test or container install, where the check only gets in the
    // way.
    let relocated = std::env::var_os(crate::STATE_DIR_ENV).is_some()
        || std::env::var_os(crate::LOG_DIR_ENV).is_some();
    if !relocated && unsafe { libc::geteuid() } != 0 {
        anyhow::bail!("You must be root to run triggers");
    }

    let mut ctx = Context::new();
    let engine = Engine::new(handlers::REGISTRY, crate::state_file_path(), crate::log_dir())
        .force(force)
        .dry_run(dry_run);

    let report = engine.run(&mut ctx, trigger)?;

    if dry_run {
        output::info(&format!(
            "dry run: {} trigger(s) inspected",
            report.handlers_run
        ));
    } else if report.failures > 0 {
        output::warning(&format!(
            "Completed with {} failure(s); {} path(s) recorded",
            report.failures, report.paths_recorded
        ));
    } else {
        output::success(&format!(
            "{} trigger(s) processed, {} path(s) recorded",
            report.handlers_run, report.paths_recorded
        ));
    }

    Ok(())
}
