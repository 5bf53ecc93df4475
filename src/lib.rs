//! stock-scraper: a paginated stock-photo search crawler
//!
//! This crate walks image-search result pages on several stock-photo sites,
//! downloads the thumbnails it finds, and records where every image came from
//! in a CSV ledger.

pub mod config;
pub mod crawler;
pub mod ledger;
pub mod output;
pub mod sites;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stock-scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    #[error(
        "Ledger file '{}' already exists. Rename it or delete it before continuing.",
        path.display()
    )]
    LedgerAlreadyExists { path: PathBuf },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unsupported site in config: {0}")]
    UnsupportedSite(String),
}

/// Result type alias for stock-scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Coordinator;
pub use ledger::{CsvLedger, ImageRecord, RecordSink};
pub use output::{RunReport, SiteStatus, SiteSummary};
pub use sites::{SiteAdapter, SiteId};
pub use state::{CrawlPhase, CrawlState};
