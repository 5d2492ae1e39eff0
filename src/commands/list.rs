//! List registered triggers.

use crate::handlers;
use colored::Colorize;

/// Print the registry as a name/description table, flagging handlers
/// whose required executable is not installed.
pub fn execute() {
    let width = handlers::REGISTRY
        .iter()
        .map(|h| h.name.len())
        .max()
        .unwrap_or(0);

    for handler in handlers::REGISTRY {
        // Pad before coloring; escape codes would throw the width off.
        let name = format!("{:>width$}", handler.name);
        if handler.available() {
            println!("{} - {}", name.bold(), handler.description);
        } else {
            println!(
                "{} - {} {}",
                name.dimmed(),
                handler.description.dimmed(),
                "(missing binary)".yellow()
            );
        }
    }
}
