//! Reel-Crawler main entry point
//!
//! This is the command-line interface for the Reel-Crawler movie ranking crawler.

use anyhow::Context;
use clap::Parser;
use reel_crawler::config::{load_config_or_default, Config};
use reel_crawler::crawler::run_crawl;
use reel_crawler::output::{load_statistics, print_statistics};
use reel_crawler::storage::SqliteStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Reel-Crawler: a cached, idempotent movie ranking crawler
///
/// Walks the ranking page, every listed movie and every newly seen actor,
/// storing movies, actors and their appearances in SQLite. Fetched pages are
/// cached on disk, so re-running resumes without refetching.
#[derive(Parser, Debug)]
#[command(name = "reel-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A cached, idempotent movie ranking crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database to crawl into (default: a fresh database-path from the config)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    if cli.stats {
        let path = cli
            .db
            .unwrap_or_else(|| PathBuf::from(&config.output.database_path));
        handle_stats(&path)
    } else {
        handle_crawl(&config, cli.db).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_crawler=info,warn"),
            1 => EnvFilter::new("reel_crawler=debug,info"),
            2 => EnvFilter::new("reel_crawler=trace,debug"),
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

/// Handles the --stats mode: shows row counts from the database
fn handle_stats(path: &Path) -> anyhow::Result<()> {
    if !path.is_file() {
        anyhow::bail!("Database {} does not exist", path.display());
    }

    println!("Database: {}\n", path.display());

    let store = SqliteStore::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, db: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match db {
        Some(path) => {
            tracing::info!("Crawling into {}", path.display());
            path
        }
        None => {
            let path = PathBuf::from(&config.output.database_path);
            remove_database(&path)?;
            tracing::info!("Crawling into fresh database {}", path.display());
            path
        }
    };

    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    tracing::info!("Page cache: {}", config.output.cache_dir);

    match run_crawl(config, store).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Deletes a database file along with its WAL side files
fn remove_database(path: &Path) -> anyhow::Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let file = PathBuf::from(file);

        if file.is_file() {
            tracing::debug!("unlink {}", file.display());
            std::fs::remove_file(&file)
                .with_context(|| format!("Failed to remove {}", file.display()))?;
        }
    }
    Ok(())
}
