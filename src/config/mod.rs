//! Configuration module for stock-scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a run without a configuration file uses
//! `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use stock_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Target images per site: {}", config.crawler.target_images);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
