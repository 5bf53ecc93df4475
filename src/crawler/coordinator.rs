//! Run coordinator - visits every enabled site for one search term
//!
//! The coordinator owns everything that lives for the whole run:
//! - The HTTP client and retry policy
//! - One adapter per enabled site, in visiting order
//! - The ledger shared by all sites
//!
//! Sites are crawled one after another. An aborted site never stops the run.

use crate::config::{validate, Config};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::page_loop::PageCrawler;
use crate::crawler::retry::RetryPolicy;
use crate::ledger::CsvLedger;
use crate::output::{RunReport, SiteStatus};
use crate::sites::{build_adapter, SiteAdapter};
use crate::ScraperError;
use chrono::Utc;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used when the term has no usable characters
const EMPTY_QUERY_DIR: &str = "query";

/// Suffix appended to the query directory name to form the ledger file name
const LEDGER_SUFFIX: &str = "_image_list.csv";

/// Main run coordinator structure
pub struct Coordinator {
    config: Config,
    term: String,
    adapters: Vec<Box<dyn SiteAdapter>>,
    client: Client,
    policy: RetryPolicy,
}

impl Coordinator {
    /// Creates a coordinator for `term`
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    /// * `term` - The search term to query every site with
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration valid and adapters built
    /// * `Err(ScraperError)` - Invalid configuration or client setup failure
    pub fn new(config: Config, term: &str) -> Result<Self, ScraperError> {
        validate(&config)?;

        let mut adapters = Vec::new();
        for site in config.enabled_sites()? {
            let origin = config.origin_for(site)?;
            adapters.push(build_adapter(site, origin.as_ref())?);
        }

        let client = build_http_client(&config.crawler)?;
        let policy = RetryPolicy::new(
            config.crawler.retry_attempts,
            Duration::from_secs(config.crawler.retry_delay_secs),
        );

        Ok(Self {
            config,
            term: term.to_string(),
            adapters,
            client,
            policy,
        })
    }

    /// Directory all output for this run is written under
    pub fn query_dir(&self) -> PathBuf {
        Path::new(&self.config.output.root).join(query_dir_name(&self.term))
    }

    /// Path of the ledger for this run
    pub fn ledger_path(&self) -> PathBuf {
        self.query_dir()
            .join(format!("{}{}", query_dir_name(&self.term), LEDGER_SUFFIX))
    }

    /// Runs the crawl across all enabled sites
    ///
    /// Refuses to start if a ledger from an earlier run with the same term is
    /// still present. Nothing is created on disk in that case.
    pub async fn run(&self) -> Result<RunReport, ScraperError> {
        let started_at = Utc::now();
        let query_dir = self.query_dir();
        let ledger_path = self.ledger_path();

        if ledger_path.exists() {
            return Err(ScraperError::LedgerAlreadyExists { path: ledger_path });
        }

        std::fs::create_dir_all(&query_dir)?;
        let mut ledger = CsvLedger::create(&ledger_path)?;
        tracing::info!("Recording images in {}", ledger.path().display());

        let mut sites = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let site = adapter.id();
            let site_dir = query_dir.join(site.key());
            std::fs::create_dir_all(&site_dir)?;

            tracing::info!("===== {} =====", site);
            let crawler = PageCrawler::new(
                adapter.as_ref(),
                &self.client,
                self.policy,
                &site_dir,
                self.config.crawler.max_skipped_pages,
            );
            let summary = crawler
                .run(&self.term, self.config.crawler.target_images, &mut ledger)
                .await?;

            match summary.status {
                SiteStatus::Done => tracing::info!(
                    "{} finished: {} images over {} pages",
                    site,
                    summary.images_recorded,
                    summary.pages_fetched
                ),
                SiteStatus::Aborted => {
                    tracing::error!("{} aborted, moving on to the next site", site)
                }
            }
            sites.push(summary);
        }

        tracing::info!("{} ledger rows written", ledger.rows());

        Ok(RunReport {
            query: self.term.clone(),
            started_at,
            finished_at: Utc::now(),
            ledger_path,
            sites,
        })
    }
}

/// Turns a search term into a single directory name
///
/// Path separators and whitespace become `_`. A name made only of dots
/// (`.`, `..`) has its dots replaced too, and a blank term maps to `query`,
/// so the result is always a plain child of the output root.
///
/// # Examples
///
/// ```
/// use stock_scraper::crawler::query_dir_name;
///
/// assert_eq!(query_dir_name("brazilian"), "brazilian");
/// assert_eq!(query_dir_name("red car/blue"), "red_car_blue");
/// assert_eq!(query_dir_name(".."), "__");
/// ```
pub fn query_dir_name(term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        return EMPTY_QUERY_DIR.to_string();
    }

    let dots_only = term.chars().all(|c| c == '.');
    term.chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() || (dots_only && c == '.') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Convenience function to run a full crawl for `term`
///
/// # Example
///
/// ```no_run
/// use stock_scraper::config::Config;
/// use stock_scraper::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "brazilian").await?;
/// println!("{} images", report.total_images());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, term: &str) -> Result<RunReport, ScraperError> {
    let coordinator = Coordinator::new(config, term)?;
    coordinator.run().await
}
