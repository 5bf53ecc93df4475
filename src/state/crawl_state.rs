use crate::state::CrawlPhase;
use crate::ScraperError;
use url::Url;

/// Mutable progress of one site's crawl
///
/// Owned by the page crawl loop for the duration of a single site and
/// dropped when that site finishes.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// URL of the page currently being processed
    pub current_url: Url,

    /// 1-based index of `current_url` within the result pages
    pub page_index: u32,

    /// Images recorded so far; also the rank of the latest image
    pub images_collected: u32,

    /// Soft quota checked between pages
    pub target_count: u32,

    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state for a crawl starting at `start_url`
    pub fn new(start_url: Url, target_count: u32) -> Self {
        Self {
            current_url: start_url,
            page_index: 1,
            images_collected: 0,
            target_count,
            phase: CrawlPhase::Fetching,
        }
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting transitions the state machine does not allow
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), ScraperError> {
        if !self.phase.can_transition_to(next) {
            return Err(ScraperError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("{} -> {} (page {})", self.phase, next, self.page_index);
        self.phase = next;
        Ok(())
    }

    /// Claims the next rank for an image
    pub fn next_rank(&mut self) -> u32 {
        self.images_collected += 1;
        self.images_collected
    }

    /// Returns true once the soft quota has been met or exceeded
    pub fn target_reached(&self) -> bool {
        self.images_collected >= self.target_count
    }

    /// Moves on to `next_url` as the following page
    pub fn advance_to(&mut self, next_url: Url) {
        self.current_url = next_url;
        self.page_index += 1;
    }
}
