//! Accumulated results of a crawl run

use crate::state::{Corpus, CrawlPhase};
use chrono::{DateTime, Utc};
use std::fmt;

/// A law for which no content could be extracted, even after fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Display text of the category link the law was found under
    pub category: String,

    /// Display text of the law link
    pub law: String,
}

impl FailureRecord {
    pub fn new(category: impl Into<String>, law: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            law: law.into(),
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.law)
    }
}

/// A fetch that failed and was passed over under the `skip` policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFetch {
    pub phase: CrawlPhase,
    pub url: String,
    pub error: String,
}

/// Everything a crawl produces
///
/// Owned by the coordinator for the duration of a run and handed back to
/// the caller when the traversal completes.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Law name to law text, in traversal order
    pub corpus: Corpus,

    /// Laws left empty, in discovery order
    pub failures: Vec<FailureRecord>,

    /// Fetches passed over under the `skip` policy
    pub skipped: Vec<SkippedFetch>,

    pub categories_visited: usize,
    pub laws_visited: usize,
    pub fallbacks_followed: usize,

    phase: CrawlPhase,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl CrawlState {
    /// Creates an empty state positioned at the statutes index
    pub fn new() -> Self {
        Self {
            corpus: Corpus::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
            categories_visited: 0,
            laws_visited: 0,
            fallbacks_followed: 0,
            phase: CrawlPhase::Index,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the traversal to a new phase
    pub fn enter(&mut self, phase: CrawlPhase) {
        tracing::trace!("Crawl phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Stores a law's content, replacing any earlier law with the same name
    pub fn record_law(&mut self, name: &str, content: String) {
        if self.corpus.insert(name, content).is_some() {
            tracing::debug!("Replacing earlier corpus entry for '{}'", name);
        }
    }

    /// Notes a law whose content stayed empty
    pub fn record_failure(&mut self, category: &str, law: &str) {
        self.failures.push(FailureRecord::new(category, law));
    }

    /// Notes a fetch that was passed over
    pub fn record_skip(&mut self, phase: CrawlPhase, url: &str, error: String) {
        self.skipped.push(SkippedFetch {
            phase,
            url: url.to_string(),
            error,
        });
    }

    /// Marks the traversal as finished
    pub fn finish(&mut self) {
        self.enter(CrawlPhase::Done);
        self.finished_at = Some(Utc::now());
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Failure records formatted as `"<category>: <law>"`
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
