//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Where a site's crawl is in its page cycle (fetching, extracting, downloading, ...)
//! - `CrawlState`: Per-site progress threaded through the page crawl loop

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use phase::CrawlPhase;
