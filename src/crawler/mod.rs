//! Crawler module for statute page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching (success means HTTP 200, nothing else)
//! - Charset detection for the raw page bytes
//! - HTML parsing and selector-based extraction
//! - Overall crawl coordination

mod coordinator;
mod encoding;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use encoding::decode_html;
pub use fetcher::{build_http_client, Fetcher, RawPage};
pub use parser::{compile_selector, element_text, Document, Link, Selectors};

use crate::config::Config;
use crate::output::write_corpus;
use crate::state::CrawlState;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Fetch any supplementary pages
/// 3. Walk the statutes index, its categories and their laws
/// 4. Return the accumulated corpus and failure records
///
/// Writing the corpus is left to the caller, so a failed crawl never
/// produces an artifact.
pub async fn crawl(config: &Config) -> Result<CrawlState, HarvestError> {
    run_crawl(config).await
}

/// Crawls and, only if the crawl succeeds, writes the corpus
///
/// The corpus goes to `output.corpus_path`, replacing any existing file.
/// When the crawl fails the existing file (if any) is left untouched.
pub async fn harvest(config: &Config) -> Result<CrawlState, HarvestError> {
    let state = crawl(config).await?;
    write_corpus(
        &state.corpus,
        Path::new(&config.output.corpus_path),
        config.output.pretty,
    )?;
    Ok(state)
}
