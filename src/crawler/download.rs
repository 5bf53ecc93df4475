//! Image download step
//!
//! Images are stored under content-addressed names: the SHA-1 of the
//! thumbnail URL plus a fixed `.jpg` extension. The same URL therefore always
//! lands on the same file, and a file that is already present is never fetched
//! again.

use crate::crawler::fetcher::fetch_with_retry;
use crate::crawler::retry::RetryPolicy;
use crate::ScraperError;
use reqwest::Client;
use sha1::{Digest, Sha1};
use std::path::Path;

/// Extension given to every downloaded image
pub const IMAGE_EXTENSION: &str = "jpg";

/// What happened to a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Bytes fetched and written to disk
    Saved,

    /// A file already existed at the destination; nothing was fetched
    AlreadyPresent,

    /// The server answered with zero bytes; nothing was written
    EmptyPayload,

    /// The fetch was given up on
    Failed,
}

/// Returns the file name an image URL is stored under
///
/// # Examples
///
/// ```
/// use stock_scraper::crawler::image_file_name;
///
/// assert_eq!(
///     image_file_name("https://example.com/a.jpg"),
///     image_file_name("https://example.com/a.jpg")
/// );
/// assert!(image_file_name("https://example.com/a.jpg").ends_with(".jpg"));
/// ```
pub fn image_file_name(thumbnail_url: &str) -> String {
    let digest = Sha1::digest(thumbnail_url.as_bytes());
    format!("{}.{}", hex::encode(digest), IMAGE_EXTENSION)
}

/// Downloads `url` to `destination` unless a file is already there
///
/// Fetch failures and empty payloads are reported through the returned
/// outcome. Only a failure to write the file is an error.
pub async fn download_image(
    client: &Client,
    policy: &RetryPolicy,
    url: &str,
    destination: &Path,
) -> Result<DownloadOutcome, ScraperError> {
    if tokio::fs::try_exists(destination).await? {
        tracing::debug!("{} already downloaded, skipping fetch", destination.display());
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    match fetch_with_retry(client, policy, url).await {
        Ok(bytes) if bytes.is_empty() => {
            tracing::warn!("Empty payload for {}", url);
            Ok(DownloadOutcome::EmptyPayload)
        }
        Ok(bytes) => {
            tokio::fs::write(destination, &bytes).await?;
            Ok(DownloadOutcome::Saved)
        }
        Err(e) => {
            tracing::warn!("Image download failed: {}", e);
            Ok(DownloadOutcome::Failed)
        }
    }
}
