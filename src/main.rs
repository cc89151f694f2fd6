//! Stock-Scout main entry point
//!
//! This is the command-line interface for the Stock-Scout catalogue crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use stock_scout::command::{range_from_args, Mode, Prompt};
use stock_scout::config::{load_config_with_hash, Config};
use stock_scout::crawler::crawl;
use stock_scout::output::{print_crawl_report, print_reconcile_report};
use stock_scout::reconcile::{run_refresh, WritePolicy};
use stock_scout::storage::{CsvStore, Store};
use tracing_subscriber::EnvFilter;

/// Stock-Scout: a retail catalogue crawler
///
/// Stock-Scout walks a shop's category menu into a table of categories and
/// in-stock products, and refreshes the stock column of that table later.
/// Without a subcommand it asks what to do interactively.
#[derive(Parser, Debug)]
#[command(name = "stock-scout")]
#[command(version = "1.0.0")]
#[command(about = "A retail catalogue crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the whole site and replace the table
    Crawl,

    /// Refresh stock for a row range of the existing table
    Refresh {
        /// First row to refresh (0-based, inclusive)
        #[arg(long)]
        start_row: Option<usize>,

        /// Row to stop before (0-based, exclusive; end of table when omitted)
        #[arg(long)]
        end_row: Option<usize>,

        /// Also write quantities resolved during this pass
        #[arg(long)]
        write_resolved: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load(cli.config.as_deref())?;

    let (mode, flag_resolved) = match cli.command {
        Some(Command::Crawl) => (Mode::Crawl, false),
        Some(Command::Refresh {
            start_row,
            end_row,
            write_resolved,
        }) => (
            Mode::Refresh(range_from_args(start_row, end_row)?),
            write_resolved,
        ),
        None => {
            let table = CsvStore::new(&config.output.table_path);
            let stdin = io::stdin();
            let mut prompt = Prompt::new(stdin.lock(), io::stdout());
            let mode = prompt
                .next_command(|| table.row_count().ok())
                .context("Failed to read a command")?;
            (mode, false)
        }
    };

    match mode {
        Mode::Crawl => handle_crawl(config).await,
        Mode::Refresh(range) => {
            let policy = WritePolicy::from_flag(config.reconcile.write_resolved || flag_resolved);
            tracing::info!("Starting stock refresh (write policy: {:?})", policy);

            let report = run_refresh(&config, range, policy)
                .await
                .context("Stock refresh failed")?;
            print_reconcile_report(&report);
            Ok(())
        }
    }
}

/// Loads the configuration file, or the built-in defaults
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stock_scout=info,warn"),
            1 => EnvFilter::new("stock_scout=debug,info"),
            2 => EnvFilter::new("stock_scout=trace,debug"),
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

/// Handles the crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl of {}", config.site.root_url);
    tracing::info!("Table will be written to {}", config.output.table_path);

    let report = crawl(config).await.context("Crawl failed")?;
    print_crawl_report(&report);
    Ok(())
}
