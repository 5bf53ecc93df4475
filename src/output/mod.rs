//! Output module for run reporting
//!
//! This module handles:
//! - Per-site crawl summaries
//! - The end-of-run report printed after all sites finish

mod report;

pub use report::{print_report, RunReport, SiteStatus, SiteSummary};
