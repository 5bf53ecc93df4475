//! Per-site summaries and the end-of-run report

use crate::crawler::DownloadOutcome;
use crate::sites::SiteId;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// How a site's crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteStatus {
    /// Finished by quota or by running out of results
    Done,

    /// No result page was ever fetched
    Aborted,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Counters collected while crawling one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub site: SiteId,
    pub status: SiteStatus,

    /// Result pages fetched successfully
    pub pages_fetched: u32,

    /// Result pages given up on after retries
    pub pages_skipped: u32,

    /// Ledger rows written; equal to the last rank handed out
    pub images_recorded: u32,

    pub images_downloaded: u32,
    pub images_already_present: u32,
    pub empty_payloads: u32,
    pub failed_downloads: u32,
}

impl SiteSummary {
    /// Creates an empty summary; the status is settled when the crawl ends
    pub fn new(site: SiteId) -> Self {
        Self {
            site,
            status: SiteStatus::Done,
            pages_fetched: 0,
            pages_skipped: 0,
            images_recorded: 0,
            images_downloaded: 0,
            images_already_present: 0,
            empty_payloads: 0,
            failed_downloads: 0,
        }
    }

    /// Counts the outcome of one image download
    pub fn record_download(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved => self.images_downloaded += 1,
            DownloadOutcome::AlreadyPresent => self.images_already_present += 1,
            DownloadOutcome::EmptyPayload => self.empty_payloads += 1,
            DownloadOutcome::Failed => self.failed_downloads += 1,
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ledger_path: PathBuf,
    pub sites: Vec<SiteSummary>,
}

impl RunReport {
    /// Ledger rows written across all sites
    pub fn total_images(&self) -> u64 {
        self.sites.iter().map(|s| u64::from(s.images_recorded)).sum()
    }

    /// Number of sites whose crawl was aborted
    pub fn aborted_sites(&self) -> usize {
        self.sites
            .iter()
            .filter(|s| s.status == SiteStatus::Aborted)
            .count()
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Run Report: {} ===\n", report.query);
    println!("Ledger: {}", report.ledger_path.display());
    println!(
        "Started: {}  Finished: {}  ({}s)",
        report.started_at.to_rfc3339(),
        report.finished_at.to_rfc3339(),
        report.duration_seconds()
    );
    println!();

    println!(
        "{:<14} {:<8} {:>6} {:>6} {:>7} {:>6} {:>7} {:>6} {:>6}",
        "site", "status", "pages", "skip", "images", "saved", "present", "empty", "failed"
    );
    for s in &report.sites {
        println!(
            "{:<14} {:<8} {:>6} {:>6} {:>7} {:>6} {:>7} {:>6} {:>6}",
            s.site.key(),
            s.status.to_string(),
            s.pages_fetched,
            s.pages_skipped,
            s.images_recorded,
            s.images_downloaded,
            s.images_already_present,
            s.empty_payloads,
            s.failed_downloads
        );
    }
    println!();

    println!(
        "Total: {} images recorded across {} sites ({} aborted)",
        report.total_images(),
        report.sites.len(),
        report.aborted_sites()
    );
}
