//! Output module for persisting and reporting crawl results
//!
//! This module handles:
//! - Writing the corpus as a JSON artifact
//! - Reading a corpus artifact back
//! - Summarising a finished crawl

pub mod stats;
mod writer;

pub use stats::{print_statistics, CrawlStatistics};
pub use writer::{read_corpus, write_corpus};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
