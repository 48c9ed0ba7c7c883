//! Spidey main entry point
//!
//! This is the command-line interface for the Spidey classify-then-crawl pipeline.

use anyhow::Context;
use clap::Parser;
use spidey::config::{load_config_with_hash, Config};
use spidey::crawler::{open_dispatcher, Outcome};
use spidey::output::{load_statistics, print_statistics};
use spidey::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Spidey: classify URLs, then crawl the ones worth keeping
///
/// Each URL is sent to a classification service. URLs labelled with the
/// configured target label are fetched, their readable text is stored, and
/// their outbound links are queued for later processing.
#[derive(Parser, Debug)]
#[command(name = "spidey")]
#[command(version = "1.0.0")]
#[command(about = "A classify-then-crawl URL pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URLs to submit for processing
    #[arg(value_name = "URL", conflicts_with = "stats")]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        handle_stats(&config)
    } else {
        handle_submit(&config, &cli.urls).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spidey=info,warn"),
            1 => EnvFilter::new("spidey=debug,info"),
            2 => EnvFilter::new("spidey=trace,debug"),
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

/// Handles the --stats mode: shows per-status counts from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(Path::new(&config.storage.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the default mode: submits every URL and waits for all of them
async fn handle_submit(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    let dispatcher = open_dispatcher(config).context("failed to start pipeline")?;

    let mut handles = Vec::with_capacity(urls.len());
    for url in urls {
        match dispatcher.submit(url) {
            Ok(handle) => handles.push((url.clone(), handle)),
            Err(e) => tracing::warn!("Not submitting {}: {}", url, e),
        }
    }
    tracing::info!("Submitted {} of {} URLs", handles.len(), urls.len());

    for (url, handle) in handles {
        match handle.await {
            Ok(Outcome::Crawled { links_queued, .. }) => {
                tracing::info!("{}: crawled, {} new links queued", url, links_queued)
            }
            Ok(Outcome::Skipped { label }) => tracing::info!("{}: skipped ({})", url, label),
            Ok(Outcome::Failed { stage, message }) => {
                tracing::warn!("{}: failed at {}: {}", url, stage, message)
            }
            Ok(Outcome::Aborted { reason }) => tracing::warn!("{}: aborted: {}", url, reason),
            Err(e) => tracing::error!("{}: task did not complete: {}", url, e),
        }
    }

    let stats = {
        let storage = dispatcher.pipeline().lock_storage();
        load_statistics(&*storage)?
    };
    print_statistics(&stats);

    Ok(())
}
