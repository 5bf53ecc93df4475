//! Crawler module for search result pages and image downloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - The per-site page crawl loop
//! - Image downloads into content-addressed files
//! - Overall run coordination across sites

mod coordinator;
mod download;
mod fetcher;
mod page_loop;
mod retry;

pub use coordinator::{query_dir_name, run_crawl, Coordinator};
pub use download::{download_image, image_file_name, DownloadOutcome, IMAGE_EXTENSION};
pub use fetcher::{build_http_client, fetch_once, fetch_with_retry, AttemptError, FetchError};
pub use page_loop::{unique_by_thumbnail, PageCrawler};
pub use retry::{RetryError, RetryPolicy};

use crate::config::Config;
use crate::output::RunReport;
use crate::ScraperError;

/// Runs a complete crawl for one search term
///
/// This is the main entry point for starting a run. It will:
/// 1. Validate the configuration
/// 2. Refuse to start if the term's ledger already exists
/// 3. Crawl every enabled site in turn
/// 4. Return the per-site summaries
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `term` - The search term
///
/// # Returns
///
/// * `Ok(RunReport)` - Every site was visited
/// * `Err(ScraperError)` - Configuration, ledger or filesystem failure
pub async fn crawl(config: Config, term: &str) -> Result<RunReport, ScraperError> {
    run_crawl(config, term).await
}
