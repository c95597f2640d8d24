//! Chandler - headless cart-session service
//!
//! Main entry point for the Chandler CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Chandler - headless cart-session service
#[derive(Parser)]
#[command(name = "chandler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (default: chandler.toml in the working
    /// directory, falling back to built-in defaults)
    #[arg(long, global = true, env = "CHANDLER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the cart API server
    Serve(commands::serve::ServeArgs),

    /// Print the resolved configuration
    Config(commands::config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "chandler=debug,chandler_server=debug,chandler_session=debug,chandler_cart=debug,info"
    } else {
        "chandler=info,chandler_server=info,chandler_session=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(cli.config.as_deref(), args).await,
        Commands::Config(args) => commands::config::run(cli.config.as_deref(), args),
    }
}
