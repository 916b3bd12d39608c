//! Shelf - Book-metadata crawler
//!
//! # Usage
//!
//! ```bash
//! # Run an ingestion
//! shelf collect --config configs/shelf.toml
//!
//! # Override the input file from the command line
//! shelf collect --config configs/shelf.toml --file subjects.txt
//!
//! # Show journal progress
//! shelf status --config configs/shelf.toml
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_config::Config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Resumable, rate-limited book-metadata crawler
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the input file against the provider and persist the results
    Collect(cmd::collect::CollectArgs),

    /// Show how many terms the progress journal marks complete
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Collect(args) => {
            let log_level = resolve_log_level(cli.log_level.as_deref(), cli.config.as_deref());
            init_logging(&log_level)?;
            cmd::collect::run(args, cli.config).await
        }
        // Status just prints to stdout; no logging needed.
        Command::Status => cmd::status::run(cli.config).await,
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config_path: Option<&std::path::Path>) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }

    if let Some(path) = config_path
        && path.exists()
        && let Ok(config) = Config::from_file(path)
    {
        return config.log.level;
    }

    "info".to_string()
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
