//! Cascade CLI
//!
//! Loads the projects of a manifest, orders their configurations and
//! resolves every parameter as a deployment would.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing subscriber already set", "warning".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Commands::Plan {
            manifest,
            environments,
            projects,
        } => commands::run_plan(&manifest, &environments, &projects),
    }
}
