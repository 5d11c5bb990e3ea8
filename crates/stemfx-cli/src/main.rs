//! stemfx CLI - inspect stages, export sessions, and validate descriptors.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stemfx")]
#[command(author, version, about = "Stem effect-chain engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the signal chain or one stage's parameters
    Stages(commands::stages::StagesArgs),

    /// Apply a session and export the renderer descriptor
    Export(commands::export::ExportArgs),

    /// Check a descriptor against the renderer schema
    Validate(commands::validate::ValidateArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so descriptor JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stages(args) => commands::stages::run(args),
        Commands::Export(args) => commands::export::run(args).await,
        Commands::Validate(args) => commands::validate::run(args),
    }
}
