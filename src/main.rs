use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use systrig::cli::{Cli, Commands};
use systrig::{commands, output};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if cli.quiet {
        output::set_verbosity(output::Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(output::Verbosity::Verbose);
    }

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            trigger,
            force,
            dry_run,
        } => commands::run::execute(trigger.as_deref(), force, dry_run)?,
        Commands::List => commands::list::execute(),
        Commands::Log => commands::log::execute()?,
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
        }
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
