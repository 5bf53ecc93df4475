//! stock-scraper main entry point
//!
//! This is the command-line interface for the stock-scraper image crawler.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use stock_scraper::config::{load_config_with_hash, Config};
use stock_scraper::crawler::crawl;
use stock_scraper::output::print_report;
use stock_scraper::ScraperError;
use tracing_subscriber::EnvFilter;

/// stock-scraper: collects stock-photo search results for a term
///
/// Walks the search result pages of each enabled stock-photo site, downloads
/// the thumbnails, and records where every image came from in a CSV ledger.
#[derive(Parser, Debug)]
#[command(name = "stock-scraper")]
#[command(version)]
#[command(about = "Collects stock-photo search results for a term", long_about = None)]
struct Cli {
    /// Search term to query every site with
    #[arg(value_name = "QUERY", default_value = "brazilian")]
    query: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output root directory, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Images to collect per site, overriding the configuration
    #[arg(short, long, value_name = "N")]
    target: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Searching for '{}'", cli.query);

    match crawl(config, &cli.query).await {
        Ok(report) => {
            print_report(&report);
            println!("Finished.");
            ExitCode::SUCCESS
        }
        Err(e @ ScraperError::LedgerAlreadyExists { .. }) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the configuration file, if any, and applies command-line overrides
fn load(cli: &Cli) -> Result<Config, ScraperError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.root = output.display().to_string();
    }
    if let Some(target) = cli.target {
        config.crawler.target_images = target;
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stock_scraper=info,warn"),
            1 => EnvFilter::new("stock_scraper=debug,info"),
            2 => EnvFilter::new("stock_scraper=trace,debug"),
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
