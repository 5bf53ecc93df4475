use crate::ledger::{ImageRecord, RecordSink};
use crate::ScraperError;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Column names written as the first row of every ledger
pub const LEDGER_HEADER: [&str; 5] = [
    "rank_pos",
    "image_url",
    "image_info_url",
    "download_file",
    "stock",
];

/// Serialized form of an [`ImageRecord`], in ledger column order
#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    rank_pos: u32,
    image_url: &'a str,
    image_info_url: &'a str,
    download_file: String,
    stock: &'static str,
}

impl<'a> From<&'a ImageRecord> for LedgerRow<'a> {
    fn from(record: &'a ImageRecord) -> Self {
        Self {
            rank_pos: record.rank,
            image_url: &record.thumbnail_url,
            image_info_url: &record.detail_url,
            download_file: record.destination_path.display().to_string(),
            stock: record.site.key(),
        }
    }
}

/// CSV-backed ledger written once per run
///
/// The file is opened with create-new semantics, so a ledger left by a
/// previous run is never reused or overwritten.
pub struct CsvLedger {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: u64,
}

impl CsvLedger {
    /// Creates a new ledger at `path` and writes its header
    ///
    /// # Returns
    ///
    /// * `Ok(CsvLedger)` - Ledger ready for appends
    /// * `Err(ScraperError::LedgerAlreadyExists)` - A file is already at `path`
    /// * `Err(ScraperError)` - The file could not be created or written
    pub fn create(path: &Path) -> Result<Self, ScraperError> {
        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ScraperError::LedgerAlreadyExists {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(LEDGER_HEADER)?;
        writer.flush()?;

        tracing::debug!("Created ledger {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    /// Location of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended through this handle
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl RecordSink for CsvLedger {
    fn append(&mut self, record: &ImageRecord) -> Result<(), ScraperError> {
        self.writer.serialize(LedgerRow::from(record))?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
