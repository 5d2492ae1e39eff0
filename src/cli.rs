//! Command-line interface definitions for systrig.
//!
//! All CLI argument parsing structures using clap's derive macros.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for systrig.
#[derive(Parser)]
#[command(
    name = "systrig",
    version = crate::VERSION,
    about = "Post-install trigger runner",
    long_about = "Runs system maintenance actions (cache rebuilds, daemon reloads) \
                  for paths that changed since the previous run"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run all triggers, or a single named trigger
    Run {
        /// Name of the trigger to run (all triggers when omitted)
        trigger: Option<String>,

        /// Dispatch every matched path even if unchanged
        #[arg(short, long)]
        force: bool,

        /// Show what would run without executing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List registered triggers
    List,

    /// Print the persistent run log
    Log,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
