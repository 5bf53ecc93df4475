//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building the HTTP client with the configured user agent and timeout
//! - Single GET attempts that follow redirects
//! - Retry of transient failures through [`RetryPolicy`]
//! - Error classification

use crate::config::CrawlerConfig;
use crate::crawler::retry::{RetryError, RetryPolicy};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Failure of a single GET attempt
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Connection, timeout or body-read failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(StatusCode),
}

impl AttemptError {
    /// Returns true if another attempt may succeed
    ///
    /// | Condition | Retry |
    /// |-----------|-------|
    /// | Timeout, connection error, body read error | yes |
    /// | HTTP 5xx | yes |
    /// | HTTP 4xx, other statuses | no |
    /// | Redirect or builder errors | no |
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
            Self::Status(status) => status.is_server_error(),
        }
    }
}

/// Failure of a fetch after the retry policy has run its course
///
/// Every variant is recoverable from the crawl loop's point of view: the page
/// or image is skipped and the crawl continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// All attempts failed with transient errors
    #[error("fetch of {url} exhausted after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: AttemptError,
    },

    /// Server answered with a status that is not worth retrying
    #[error("fetch of {url} rejected with HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// Request failed in a way that is not worth retrying
    #[error("fetch of {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
}

/// Builds an HTTP client with proper configuration
///
/// The client follows redirects (up to 10 hops) and applies the same request
/// timeout to every fetch.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use stock_scraper::config::CrawlerConfig;
/// use stock_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a single GET and returns the response body
///
/// An empty body is a successful fetch of zero bytes.
pub async fn fetch_once(client: &Client, url: &str) -> Result<Vec<u8>, AttemptError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AttemptError::Status(status));
    }

    let body = response.bytes().await?;
    Ok(body.to_vec())
}

/// Fetches `url`, retrying transient failures according to `policy`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `policy` - Attempt count and delay between attempts
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - Response body, possibly empty
/// * `Err(FetchError)` - The fetch was given up on
pub async fn fetch_with_retry(
    client: &Client,
    policy: &RetryPolicy,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    let result = policy
        .run(
            |attempt| {
                if attempt > 1 {
                    tracing::debug!("Retrying {} (attempt {})", url, attempt);
                }
                fetch_once(client, url)
            },
            AttemptError::is_transient,
        )
        .await;

    result.map_err(|e| match e {
        RetryError::Exhausted { attempts, last } => FetchError::Exhausted {
            url: url.to_string(),
            attempts,
            last,
        },
        RetryError::Fatal(AttemptError::Status(status)) => FetchError::Status {
            url: url.to_string(),
            status,
        },
        RetryError::Fatal(AttemptError::Request(source)) => FetchError::Request {
            url: url.to_string(),
            source,
        },
    })
}
