//! Matiz CLI - offline audio effect processing from the command line.

mod commands;
mod effects;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "matiz")]
#[command(author, version, about = "Offline audio effect processor", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an effect to a WAV file
    Process(commands::process::ProcessArgs),

    /// List available effects and their parameters
    Effects(commands::effects::EffectsArgs),

    /// Show WAV file metadata
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
