//! Pagelens main entry point
//!
//! Command-line interface for the Pagelens page analyzer: run the HTTP API
//! or analyze a single URL from the shell.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagelens::config::{load_config, Config, StorageBackend};
use pagelens::storage::{MemoryStore, SessionStore, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Pagelens: a single-page structure analyzer
///
/// Fetches one web page, extracts its structure (title, HTML version,
/// headings, login form), and probes every outbound link to classify it
/// as accessible/inaccessible and internal/external.
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(version = "1.0.0")]
#[command(about = "A single-page structure analyzer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve,

    /// Analyze one URL and print the snapshot as JSON
    Analyze {
        /// Absolute URL of the page to analyze
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Serve => handle_serve(config).await,
        Command::Analyze { url } => handle_analyze(config, &url).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagelens=info,warn"),
            1 => EnvFilter::new("pagelens=debug,info"),
            2 => EnvFilter::new("pagelens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the session store selected by the configuration
fn build_store(config: &Config) -> anyhow::Result<Arc<dyn SessionStore>> {
    match config.storage.backend {
        StorageBackend::Sqlite => {
            let path = Path::new(&config.storage.database_path);
            tracing::info!("Using sqlite session store at {}", path.display());
            Ok(Arc::new(SqliteStore::new(path)?))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory session store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Handles the serve subcommand: runs the HTTP API until shutdown
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let store = build_store(&config)?;

    pagelens::server::serve(config, store)
        .await
        .context("server failed")?;

    Ok(())
}

/// Handles the analyze subcommand: one-shot analysis printed to stdout
async fn handle_analyze(config: Config, url: &str) -> anyhow::Result<()> {
    let store = build_store(&config)?;

    let snapshot = pagelens::analyzer::analyze_page(Arc::new(config), store, url)
        .await
        .with_context(|| format!("analyzing {url}"))?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
