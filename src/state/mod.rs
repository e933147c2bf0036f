//! State shared by every crawl worker
//!
//! # Components
//!
//! - `VisitedSet`: atomic check-and-mark over normalized URLs
//! - `CompletionTracker`: outstanding-work counter that detects the end of the crawl
//! - `CrawlState`: the Running → Draining → Terminated lifecycle it publishes

mod crawl_state;
mod tracker;
mod visited;

// Re-export main types
pub use crawl_state::CrawlState;
pub use tracker::CompletionTracker;
pub use visited::VisitedSet;
