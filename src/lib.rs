#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Systrig - Post-Install Trigger Runner
//!
//! Systrig runs the system maintenance actions that become necessary after
//! packages change files under well-known directories: rebuilding the
//! dynamic linker cache, regenerating icon and font caches, reloading
//! systemd, and so on. Each action is a *handler* bound to a set of glob
//! patterns; a persisted fingerprint per matched path ensures actions run
//! only when their inputs actually changed.
//!
//! ## Architecture
//!
//! - [`engine`]: The dispatch engine (glob walk, staleness checks, status
//!   interpretation, transactional state update)
//! - [`handlers`]: The ordered, compiled-in handler registry
//! - [`state`]: Fingerprint persistence across runs
//! - [`context`]: Per-run environment flags and the skip set
//! - [`status`]: The multi-signal handler result type
//! - [`lock`]: Cross-process run locking
//! - [`output`]: Console output and the failure reporter
//! - [`commands`]: CLI command implementations
//! - [`utils`]: Fingerprinting, command execution, small helpers
//!
//! ## Example
//!
//! ```no_run
//! use systrig::context::Context;
//! use systrig::engine::Engine;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut ctx = Context::new();
//! let engine = Engine::new(
//!     systrig::handlers::REGISTRY,
//!     systrig::state_file_path(),
//!     systrig::log_dir(),
//! );
//! let report = engine.run(&mut ctx, Some("ldconfig"))?;
//! println!("{} paths recorded", report.paths_recorded);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Per-run environment flags and the skip set.
pub mod context;

/// The trigger dispatch engine.
pub mod engine;

/// The compiled-in handler registry.
pub mod handlers;

/// Run locking to prevent concurrent trigger runs.
pub mod lock;

/// Console output and the failure reporter.
pub mod output;

/// Fingerprint persistence across runs.
pub mod state;

/// Handler action outcome signals.
pub mod status;

/// Utility functions and helpers.
pub mod utils;

use std::path::PathBuf;

/// Current version of the systrig binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory for the persisted state file.
pub const DEFAULT_STATE_DIR: &str = "/var/lib/systrig";

/// Name of the state file inside the state directory.
pub const STATE_FILE_NAME: &str = "state.bin";

/// Default directory for the persistent run log.
pub const DEFAULT_LOG_DIR: &str = "/var/log/systrig";

/// Name of the run log inside the log directory.
pub const LOG_FILE_NAME: &str = "systrig.log";

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "SYSTRIG_STATE_DIR";

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "SYSTRIG_LOG_DIR";

/// Resolves the state directory, honoring the environment override.
#[must_use]
pub fn state_dir() -> PathBuf {
    std::env::var_os(STATE_DIR_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from)
}

/// Resolves the full path of the state file.
#[must_use]
pub fn state_file_path() -> PathBuf {
    state_dir().join(STATE_FILE_NAME)
}

/// Resolves the log directory, honoring the environment override.
#[must_use]
pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from)
}

/// Resolves the full path of the run log file.
#[must_use]
pub fn log_file_path() -> PathBuf {
    log_dir().join(LOG_FILE_NAME)
}
