//! Per-site page crawl loop
//!
//! Drives one site from its first search page to completion:
//!
//! ```text
//! Fetching ──ok──> Extracting ──> Downloading ──> Advancing ──next──> Fetching
//!    │                                               │
//!    ├─fail, a page was parsed before──> Advancing   └─quota / no next──> Done
//!    └─fail, nothing parsed yet──> Aborted
//! ```
//!
//! The quota is checked only in Advancing: a page is always processed to its
//! last result, even if that overshoots the target.

use crate::crawler::download::{download_image, image_file_name};
use crate::crawler::fetcher::fetch_with_retry;
use crate::crawler::retry::RetryPolicy;
use crate::ledger::{ImageRecord, RecordSink};
use crate::output::{SiteStatus, SiteSummary};
use crate::sites::{ImageLink, SiteAdapter};
use crate::state::{CrawlPhase, CrawlState};
use crate::ScraperError;
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Crawls the result pages of a single site
pub struct PageCrawler<'a> {
    adapter: &'a dyn SiteAdapter,
    client: &'a Client,
    policy: RetryPolicy,
    site_dir: PathBuf,
    max_skipped_pages: u32,
}

impl<'a> PageCrawler<'a> {
    /// Creates a crawler that stores images under `site_dir`
    ///
    /// `max_skipped_pages` bounds how many consecutive result pages may fail
    /// before the site is considered finished.
    pub fn new(
        adapter: &'a dyn SiteAdapter,
        client: &'a Client,
        policy: RetryPolicy,
        site_dir: &Path,
        max_skipped_pages: u32,
    ) -> Self {
        Self {
            adapter,
            client,
            policy,
            site_dir: site_dir.to_path_buf(),
            max_skipped_pages: max_skipped_pages.max(1),
        }
    }

    /// Runs the crawl for `term` until Done or Aborted
    ///
    /// Page and image fetch failures are absorbed here. Only ledger and
    /// filesystem errors are returned.
    ///
    /// # Arguments
    ///
    /// * `term` - The search term
    /// * `target` - Soft image quota, checked between pages
    /// * `sink` - Where image records are appended
    pub async fn run(
        &self,
        term: &str,
        target: u32,
        sink: &mut dyn RecordSink,
    ) -> Result<SiteSummary, ScraperError> {
        let site = self.adapter.id();
        let start_url = self.adapter.query_url(term)?;
        let mut state = CrawlState::new(start_url, target);
        let mut summary = SiteSummary::new(site);

        // Body of the last page that was fetched and parsed
        let mut last_page: Option<String> = None;
        let mut fetched: Option<String> = None;
        let mut links: Vec<ImageLink> = Vec::new();
        let mut consecutive_failures = 0u32;

        tracing::info!("{}: starting at {}", site, state.current_url);

        loop {
            match state.phase() {
                CrawlPhase::Fetching => {
                    tracing::info!("{}: page {}", site, state.page_index);
                    match fetch_with_retry(self.client, &self.policy, state.current_url.as_str())
                        .await
                    {
                        Ok(bytes) => {
                            consecutive_failures = 0;
                            summary.pages_fetched += 1;
                            fetched = Some(String::from_utf8_lossy(&bytes).into_owned());
                            state.transition(CrawlPhase::Extracting)?;
                        }
                        Err(e) if last_page.is_some() => {
                            consecutive_failures += 1;
                            summary.pages_skipped += 1;
                            tracing::warn!("{}: skipping page {}: {}", site, state.page_index, e);
                            state.transition(CrawlPhase::Advancing)?;
                        }
                        Err(e) => {
                            summary.pages_skipped += 1;
                            tracing::error!("{}: first page unavailable: {}", site, e);
                            state.transition(CrawlPhase::Aborted)?;
                        }
                    }
                }

                CrawlPhase::Extracting => {
                    let page = fetched.take().unwrap_or_default();
                    links = unique_by_thumbnail(extract_links(self.adapter, &page));
                    tracing::debug!(
                        "{}: {} results on page {}",
                        site,
                        links.len(),
                        state.page_index
                    );
                    last_page = Some(page);
                    state.transition(CrawlPhase::Downloading)?;
                }

                CrawlPhase::Downloading => {
                    for link in std::mem::take(&mut links) {
                        self.process_image(&mut state, &mut summary, sink, link)
                            .await?;
                    }
                    tracing::info!(
                        "{}: {} images after page {}",
                        site,
                        state.images_collected,
                        state.page_index
                    );
                    state.transition(CrawlPhase::Advancing)?;
                }

                CrawlPhase::Advancing => {
                    if state.target_reached() {
                        tracing::info!(
                            "{}: target of {} reached ({} images)",
                            site,
                            state.target_count,
                            state.images_collected
                        );
                        state.transition(CrawlPhase::Done)?;
                        continue;
                    }

                    if consecutive_failures >= self.max_skipped_pages {
                        tracing::warn!(
                            "{}: {} pages in a row failed, giving up",
                            site,
                            consecutive_failures
                        );
                        state.transition(CrawlPhase::Done)?;
                        continue;
                    }

                    let next = last_page.as_deref().and_then(|page| {
                        derive_next_url(self.adapter, page, &state.current_url, state.page_index)
                    });

                    match next {
                        Some(url) if url == state.current_url => {
                            tracing::warn!(
                                "{}: next page is the current page {}, stopping",
                                site,
                                url
                            );
                            state.transition(CrawlPhase::Done)?;
                        }
                        Some(url) => {
                            tracing::info!("{}: ** next page ** {}", site, url);
                            state.advance_to(url);
                            state.transition(CrawlPhase::Fetching)?;
                        }
                        None => {
                            tracing::info!("{}: no further result pages", site);
                            state.transition(CrawlPhase::Done)?;
                        }
                    }
                }

                CrawlPhase::Done => {
                    summary.status = SiteStatus::Done;
                    break;
                }

                CrawlPhase::Aborted => {
                    summary.status = SiteStatus::Aborted;
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Ranks, records and downloads one image
    async fn process_image(
        &self,
        state: &mut CrawlState,
        summary: &mut SiteSummary,
        sink: &mut dyn RecordSink,
        link: ImageLink,
    ) -> Result<(), ScraperError> {
        let rank = state.next_rank();
        let destination = self.site_dir.join(image_file_name(&link.thumbnail_url));

        let record = ImageRecord {
            rank,
            thumbnail_url: link.thumbnail_url,
            detail_url: link.detail_url,
            destination_path: destination,
            site: self.adapter.id(),
        };
        sink.append(&record)?;
        summary.images_recorded += 1;

        tracing::debug!("{}: #{} {}", record.site, rank, record.thumbnail_url);

        let outcome = download_image(
            self.client,
            &self.policy,
            &record.thumbnail_url,
            &record.destination_path,
        )
        .await?;
        summary.record_download(outcome);

        Ok(())
    }
}

/// Parses a page and extracts its results
fn extract_links(adapter: &dyn SiteAdapter, page: &str) -> Vec<ImageLink> {
    let document = Html::parse_document(page);
    adapter.extract(&document)
}

/// Parses a page and derives the URL that follows it
fn derive_next_url(
    adapter: &dyn SiteAdapter,
    page: &str,
    current: &Url,
    page_index: u32,
) -> Option<Url> {
    let document = Html::parse_document(page);
    adapter.next_url(&document, current, page_index)
}

/// Drops results whose thumbnail URL already appeared earlier on the page
pub fn unique_by_thumbnail(links: Vec<ImageLink>) -> Vec<ImageLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.thumbnail_url.clone()))
        .collect()
}
