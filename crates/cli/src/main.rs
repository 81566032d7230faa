//! dagseal CLI - dagseal command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// dagseal - Seal content-addressed DAGs into a sealing service
#[derive(Parser)]
#[command(name = "dagseal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Block store directory
    #[arg(long, global = true, default_value = ".dagseal")]
    store: PathBuf,

    /// Configuration file (defaults apply when it does not exist)
    #[arg(long, global = true, default_value = "dagseal.toml")]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a file or directory and print its root id
    Import {
        /// Path to import
        path: PathBuf,
    },
    /// Seal every node reachable from a root
    Seal {
        /// Root node id (raw-<hex> or dag-<hex>)
        id: String,
    },
    /// Write a node's original bytes to stdout, unsealing if needed
    Get {
        /// Node id
        id: String,
    },
    /// Print a node's original size without contacting the service
    Size {
        /// Node id
        id: String,
    },
    /// Show the effective configuration
    Config {
        /// Print a commented example file instead
        #[arg(long)]
        example: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Import { path } => cmd::import::run(&cli.store, &path).await,
        Commands::Seal { id } => cmd::seal::run(&cli.store, &cli.config, &id).await,
        Commands::Get { id } => cmd::get::run(&cli.store, &cli.config, &id).await,
        Commands::Size { id } => cmd::size::run(&cli.store, &id).await,
        Commands::Config { example } => cmd::config::run(&cli.config, example).await,
    }
}
