//! The trigger dispatch engine.
//!
//! One [`Engine::run`] walks the selected handlers in registry order,
//! expands each handler's glob patterns, consults the state tracker to
//! skip paths whose fingerprints are unchanged, invokes the actions, and
//! interprets the returned status signals. State is written back
//! atomically once at the end of the run.

use crate::context::Context;
use crate::handlers::Handler;
use crate::lock::RunLock;
use crate::output;
use crate::state::StateTracker;
use crate::status::Status;
use crate::utils::exec;
use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Counters summarizing one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunReport {
    /// Handlers selected and walked.
    pub handlers_run: usize,
    /// Paths recorded as up to date in this run's state.
    pub paths_recorded: usize,
    /// Per-path action failures. These never abort the run.
    pub failures: usize,
}

/// Drives one run over a handler registry.
///
/// The engine owns no global state: registry, state file, and log
/// directory are all injected, so tests run it against temp directories
/// and synthetic handlers.
#[derive(Debug)]
pub struct Engine<'a> {
    registry: &'a [Handler],
    state_path: PathBuf,
    log_dir: PathBuf,
    force: bool,
    dry_run: bool,
}

impl<'a> Engine<'a> {
    /// Creates an engine over `registry`, persisting state at `state_path`
    /// and logging under `log_dir`.
    #[must_use]
    pub fn new(registry: &'a [Handler], state_path: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            registry,
            state_path,
            log_dir,
            force: false,
            dry_run: false,
        }
    }

    /// Dispatch every matched path regardless of recorded fingerprints.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Report what would run without invoking actions or touching state.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Full path of the run log file under the engine's log directory.
    fn log_file(&self) -> PathBuf {
        self.log_dir.join(crate::LOG_FILE_NAME)
    }

    /// Runs all triggers, or only the one named by `only`.
    ///
    /// Per-path action failures are reported and counted but do not abort
    /// the run; see [`RunReport::failures`].
    ///
    /// # Errors
    ///
    /// Returns an error for structural failures only: an unknown trigger
    /// name, an uncreatable log or state directory, a concurrent run
    /// holding the lock, or a failed final state write.
    pub fn run(&self, ctx: &mut Context, only: Option<&str>) -> Result<RunReport> {
        // User error, checked before any side effects happen.
        if let Some(name) = only
            && !self.registry.iter().any(|h| h.name == name)
        {
            bail!("Unknown trigger '{name}'");
        }

        std::fs::create_dir_all(&self.log_dir).with_context(|| {
            format!("Cannot construct log directory {}", self.log_dir.display())
        })?;

        let state_dir = self
            .state_path
            .parent()
            .context("State file path has no parent directory")?;
        let _lock = RunLock::acquire(state_dir)?;

        let mut tracker = StateTracker::new(self.state_path.clone());
        if let Err(e) = tracker.load() {
            warn!(error = %e, "previous state discarded");
            output::warning(&format!("Discarding invalid state: {e}"));
        }

        exec::log_line(&self.log_file(), "--- trigger run started ---");

        let mut report = RunReport::default();
        for handler in self.registry {
            if let Some(name) = only
                && handler.name != name
            {
                continue;
            }
            self.run_handler(handler, ctx, &mut tracker, &mut report);
            report.handlers_run += 1;
        }

        if report.handlers_run == 0 {
            bail!("No triggers ran");
        }

        if self.dry_run {
            return Ok(report);
        }

        // Individual actions may have succeeded, but losing the state
        // write means redundant reprocessing next run: report it as a
        // failed run.
        tracker.write().context("Failed to write state file")?;

        Ok(report)
    }

    /// Walks one handler's glob patterns.
    fn run_handler(
        &self,
        handler: &Handler,
        ctx: &mut Context,
        tracker: &mut StateTracker,
        report: &mut RunReport,
    ) {
        debug!(handler = handler.name, "dispatching");

        for &pattern in handler.globs {
            // A pattern that matches nothing and a pattern that does not
            // parse are both non-events.
            let Ok(matches) = glob::glob(pattern) else {
                debug!(handler = handler.name, pattern, "pattern did not parse");
                continue;
            };

            // Set once a status carries BREAK; the remaining matches of
            // this pattern are then treated as handled without invoking
            // the action. Later patterns start fresh.
            let mut pass_status: Option<Status> = None;

            for entry in matches {
                let Ok(path) = entry else { continue };

                if let Some(breaking) = pass_status {
                    self.record(handler, &path, breaking, tracker, report);
                    continue;
                }

                if !self.force && !tracker.needs_update(&path) {
                    continue;
                }

                if self.dry_run {
                    output::info(&format!(
                        "would run {} for {}",
                        handler.name,
                        path.display()
                    ));
                    continue;
                }

                let status = (handler.action)(ctx, &path);
                debug!(handler = handler.name, path = %path.display(), %status, "action finished");

                if status.fail {
                    report.failures += 1;
                    output::error(&format!(
                        "{} failed for {}",
                        handler.name,
                        path.display()
                    ));
                    output::dump_log(&self.log_file());
                }

                if status.break_pass {
                    pass_status = Some(status);
                }

                if status.success {
                    self.record(handler, &path, status, tracker, report);
                }
            }
        }
    }

    /// Persists one handled path into the tracker, honoring DROP. A record
    /// failure costs a redundant reprocess next run, nothing more.
    fn record(
        &self,
        handler: &Handler,
        path: &Path,
        status: Status,
        tracker: &mut StateTracker,
        report: &mut RunReport,
    ) {
        if status.drop_record {
            return;
        }
        match tracker.push_path(path) {
            Ok(()) => report.paths_recorded += 1,
            Err(e) => {
                warn!(handler = handler.name, path = %path.display(), error = %e, "record failed");
                output::warning(&format!("Failed to record path {}: {e}", path.display()));
            }
        }
    }
}
