//! Provenance ledger
//!
//! Every image discovered during a run is recorded exactly once, in rank
//! order, before its download is attempted. The ledger is append-only: there
//! are no update or delete operations.

mod csv_ledger;

pub use csv_ledger::{CsvLedger, LEDGER_HEADER};

use crate::sites::SiteId;
use crate::ScraperError;
use std::path::PathBuf;

/// One discovered image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// 1-based position within the site's crawl
    pub rank: u32,

    /// URL the image bytes are fetched from
    pub thumbnail_url: String,

    /// URL of the image's detail page, empty if none was found
    pub detail_url: String,

    /// Where the image is (or would be) stored
    pub destination_path: PathBuf,

    /// Site the image was found on
    pub site: SiteId,
}

/// Append-only destination for image records
///
/// Implementations must persist each record before returning, so that an
/// interrupted run keeps every row written so far.
pub trait RecordSink {
    /// Appends one record
    fn append(&mut self, record: &ImageRecord) -> Result<(), ScraperError>;
}

impl RecordSink for Vec<ImageRecord> {
    fn append(&mut self, record: &ImageRecord) -> Result<(), ScraperError> {
        self.push(record.clone());
        Ok(())
    }
}
