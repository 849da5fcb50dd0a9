//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Quarry - incremental builds and component tables for flat C projects
#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print compiler commands and staleness decisions
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show compiler output and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub manifest_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile stale sources and link the binary
    Build(BuildArgs),

    /// Remove object files and the binary
    Clean(CleanArgs),

    /// Regenerate component tables
    Tables(TablesArgs),

    /// Show what the next build would compile, and why
    Status(StatusArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Ignore the build ledger and rebuild everything
    #[arg(short, long, conflicts_with = "link")]
    pub force: bool,

    /// Relink existing objects without compiling
    #[arg(short, long)]
    pub link: bool,

    /// Regenerate component tables before building
    #[arg(short, long)]
    pub tables: bool,

    /// Build with debug symbols
    #[arg(short, long)]
    pub debug: bool,

    /// Build with AddressSanitizer
    #[arg(long)]
    pub sanitize: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct TablesArgs {
    /// Only regenerate this domain (entity, weapon)
    #[arg(long, value_name = "NAME")]
    pub domain: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Report as if the ledger were missing
    #[arg(short, long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
