/// Phase definitions for the per-site crawl state machine
///
/// A site's crawl moves through these phases once per result page until it
/// reaches one of the two terminal phases.
use std::fmt;

/// Represents where a site's crawl currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Fetching the current result page
    Fetching,

    /// Pulling result elements out of the fetched page
    Extracting,

    /// Recording and downloading the page's images
    Downloading,

    /// Checking the quota and deriving the next page URL
    Advancing,

    // ===== Terminal Phases =====
    /// Crawl finished by quota or by running out of results
    Done,

    /// The very first page could never be fetched
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// | From | To |
    /// |------|----|
    /// | Fetching | Extracting, Advancing, Aborted |
    /// | Extracting | Downloading |
    /// | Downloading | Advancing |
    /// | Advancing | Fetching, Done |
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Advancing)
                | (Self::Fetching, Self::Aborted)
                | (Self::Extracting, Self::Downloading)
                | (Self::Downloading, Self::Advancing)
                | (Self::Advancing, Self::Fetching)
                | (Self::Advancing, Self::Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Downloading => "downloading",
            Self::Advancing => "advancing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
