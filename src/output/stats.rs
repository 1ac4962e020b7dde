//! End-of-run crawl statistics
//!
//! This module summarises a finished [`CrawlState`] and prints the summary,
//! including the list of laws that came back empty.

use crate::state::CrawlState;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Categories whose page was fetched
    pub categories_visited: usize,

    /// Law pages fetched
    pub laws_visited: usize,

    /// Full act pages fetched because the law page had no content
    pub fallbacks_followed: usize,

    /// Entries in the corpus
    pub corpus_entries: usize,

    /// Corpus entries with empty text
    pub empty_entries: usize,

    /// Wall-clock duration of the crawl, if it finished
    pub duration_seconds: Option<i64>,

    /// `"<category>: <law>"` for every law left empty
    pub failures: Vec<String>,

    /// `"<url>: <error>"` for every fetch skipped under the skip policy
    pub skipped: Vec<String>,
}

impl CrawlStatistics {
    /// Builds statistics from a crawl state
    pub fn from_state(state: &CrawlState) -> Self {
        let duration_seconds = state
            .finished_at()
            .map(|finished| (finished - state.started_at()).num_seconds());

        Self {
            categories_visited: state.categories_visited,
            laws_visited: state.laws_visited,
            fallbacks_followed: state.fallbacks_followed,
            corpus_entries: state.corpus.len(),
            empty_entries: state.corpus.empty_count(),
            duration_seconds,
            failures: state.failure_lines(),
            skipped: state
                .skipped
                .iter()
                .map(|skip| format!("{}: {}", skip.url, skip.error))
                .collect(),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Categories visited: {}", stats.categories_visited);
    println!("  Laws visited: {}", stats.laws_visited);
    println!("  Full act fallbacks: {}", stats.fallbacks_followed);
    println!(
        "  Corpus entries: {} ({} empty)",
        stats.corpus_entries, stats.empty_entries
    );
    if let Some(seconds) = stats.duration_seconds {
        println!("  Duration: {}s", seconds);
    }
    println!();

    if !stats.failures.is_empty() {
        println!("Failed to scrape ({}):", stats.failures.len());
        for failure in &stats.failures {
            println!("  - {}", failure);
        }
        println!();
    }

    if !stats.skipped.is_empty() {
        println!("Skipped fetches ({}):", stats.skipped.len());
        for skipped in &stats.skipped {
            println!("  - {}", skipped);
        }
        println!();
    }
}
