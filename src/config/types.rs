use crate::sites::SiteId;
use crate::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Main configuration structure for stock-scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,

    /// Site key -> enabled flag
    pub sites: BTreeMap<String, bool>,

    /// Site key -> origin override (scheme, host and port)
    pub origins: BTreeMap<String, String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Soft per-site image quota, checked between result pages
    #[serde(rename = "target-images")]
    pub target_images: u32,

    /// Total attempts per fetch, including the first one
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Pause between fetch attempts (seconds)
    #[serde(rename = "retry-delay-secs")]
    pub retry_delay_secs: u64,

    /// Timeout applied to every HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Consecutive failed page fetches tolerated before a site is ended
    #[serde(rename = "max-skipped-pages")]
    pub max_skipped_pages: u32,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            target_images: 5000,
            retry_attempts: 5,
            retry_delay_secs: 5,
            request_timeout_secs: 100,
            max_skipped_pages: 5,
            user_agent: format!("stock-scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which the per-query output directory is created
    pub root: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
        }
    }
}

impl Config {
    /// Returns the enabled sites in visiting order
    ///
    /// With no `[sites]` table at all, Getty Images and iStock are enabled.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SiteId>)` - Enabled sites, possibly empty
    /// * `Err(ConfigError::UnsupportedSite)` - A key names no known site
    pub fn enabled_sites(&self) -> Result<Vec<SiteId>, ConfigError> {
        if self.sites.is_empty() {
            return Ok(vec![SiteId::GettyImages, SiteId::IStock]);
        }

        let mut enabled = Vec::new();
        for (key, on) in &self.sites {
            let site = parse_site_key(key)?;
            if *on {
                enabled.push(site);
            }
        }
        enabled.sort();
        enabled.dedup();
        Ok(enabled)
    }

    /// Returns the origin override configured for `site`, if any
    pub fn origin_for(&self, site: SiteId) -> Result<Option<Url>, ConfigError> {
        for (key, origin) in &self.origins {
            if parse_site_key(key)? == site {
                let url = Url::parse(origin).map_err(|e| {
                    ConfigError::InvalidUrl(format!("Invalid origin for '{}': {}", key, e))
                })?;
                return Ok(Some(url));
            }
        }
        Ok(None)
    }
}

fn parse_site_key(key: &str) -> Result<SiteId, ConfigError> {
    key.parse::<SiteId>()
        .map_err(|_| ConfigError::UnsupportedSite(key.to_string()))
}
