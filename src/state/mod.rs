//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Corpus`: insertion-ordered law name to law text mapping
//! - `CrawlPhase`: where the traversal currently is
//! - `CrawlState`: corpus, failure records and counters for one run

mod corpus;
mod crawl_state;
mod phase;

// Re-export main types
pub use corpus::Corpus;
pub use crawl_state::{CrawlState, FailureRecord, SkippedFetch};
pub use phase::CrawlPhase;
