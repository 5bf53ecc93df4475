//! Site adapters for the supported stock-photo search engines
//!
//! Every site is described by a static [`SiteConfig`] and driven through the
//! [`SiteAdapter`] trait:
//! - building the initial search URL for a query term
//! - extracting `(thumbnail, detail page)` pairs from a result page
//! - deriving the URL of the following result page

mod adobe_stock;
mod getty;
mod istock;
mod links;
mod rules;
mod shutterstock;
mod stock_site;

pub use links::{resolve_link, with_query_param};
pub use rules::{FieldRule, Pagination, SiteConfig, TERM_PLACEHOLDER};
pub use stock_site::StockSite;

use crate::ScraperError;
use scraper::Html;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Supported stock-photo sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SiteId {
    GettyImages,
    IStock,
    Shutterstock,
    AdobeStock,
}

impl SiteId {
    /// All sites, in the order a run visits them
    pub const ALL: [SiteId; 4] = [
        SiteId::GettyImages,
        SiteId::IStock,
        SiteId::Shutterstock,
        SiteId::AdobeStock,
    ];

    /// Stable key used in configuration, ledger rows and output directories
    pub fn key(&self) -> &'static str {
        match self {
            Self::GettyImages => "getty-images",
            Self::IStock => "istock",
            Self::Shutterstock => "shutterstock",
            Self::AdobeStock => "adobe-stock",
        }
    }

    /// Static search and pagination rules for this site
    pub fn config(&self) -> &'static SiteConfig {
        match self {
            Self::GettyImages => &getty::CONFIG,
            Self::IStock => &istock::CONFIG,
            Self::Shutterstock => &shutterstock::CONFIG,
            Self::AdobeStock => &adobe_stock::CONFIG,
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SiteId {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SiteId::ALL
            .into_iter()
            .find(|site| site.key() == key)
            .ok_or_else(|| ScraperError::UnsupportedSite(s.to_string()))
    }
}

/// One search result as found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// Absolute thumbnail URL
    pub thumbnail_url: String,

    /// Absolute detail-page URL, empty when the result has no link
    pub detail_url: String,
}

/// Per-site knowledge of query construction, extraction and pagination
///
/// Implementations hold no crawl state; every call depends only on its
/// arguments.
pub trait SiteAdapter {
    /// The site this adapter handles
    fn id(&self) -> SiteId;

    /// Builds the first search result URL for `term`
    fn query_url(&self, term: &str) -> Result<Url, ScraperError>;

    /// Extracts results from a page in document order
    fn extract(&self, document: &Html) -> Vec<ImageLink>;

    /// Derives the URL of the page after `current`
    ///
    /// `page_index` is the 1-based index of `current`. Returns None when the
    /// page offers no way forward, which marks the end of the results.
    fn next_url(&self, document: &Html, current: &Url, page_index: u32) -> Option<Url>;
}

/// Builds the adapter for `id`, optionally pointed at a different origin
///
/// # Arguments
///
/// * `id` - The site to build an adapter for
/// * `origin` - Origin override; the site's public origin is used if None
///
/// # Returns
///
/// * `Ok(Box<dyn SiteAdapter>)` - Ready-to-use adapter
/// * `Err(ScraperError)` - A selector or origin failed to parse
pub fn build_adapter(id: SiteId, origin: Option<&Url>) -> Result<Box<dyn SiteAdapter>, ScraperError> {
    let site = match origin {
        Some(origin) => StockSite::with_origin(id.config(), origin.clone())?,
        None => StockSite::new(id.config())?,
    };
    Ok(Box::new(site))
}
