//! Quarry CLI - incremental builds for flat C projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("quarry=debug")
    } else if cli.quiet {
        EnvFilter::new("quarry=warn")
    } else {
        EnvFilter::new("quarry=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(cli.manifest_dir.as_deref(), cli.verbose, cli.quiet)?;

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &session),
        Commands::Clean(args) => commands::clean::execute(args, &session),
        Commands::Tables(args) => commands::tables::execute(args, &session),
        Commands::Status(args) => commands::status::execute(args, &session),
    }
}
