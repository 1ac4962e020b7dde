//! Crawl phase definitions
//!
//! The crawl is a strictly nested walk: the statutes index, then each
//! category in document order, then each law in that category, with an
//! optional detour to the law's full act page.

use std::fmt;

/// Where the crawler currently is in the traversal
///
/// Indices are zero-based positions in document order: `Law(i, j)` is the
/// `j`th law of the `i`th category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Fetching the top-level statutes index
    Index,

    /// Fetching a configured supplementary page
    Supplement(usize),

    /// Fetching a category page
    Category(usize),

    /// Fetching an individual law page
    Law(usize, usize),

    /// Fetching the full act page of a law that had no inline content
    Fallback(usize, usize),

    /// Traversal finished
    Done,
}

impl CrawlPhase {
    /// Returns true once the traversal has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if a fetch failure here leaves nothing to continue with
    ///
    /// Without the index there are no categories to visit, so it is fatal
    /// regardless of the configured fetch-error policy.
    pub fn is_always_fatal(&self) -> bool {
        matches!(self, Self::Index)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => write!(f, "fetching statutes index"),
            Self::Supplement(i) => write!(f, "fetching supplement #{}", i + 1),
            Self::Category(i) => write!(f, "fetching category #{}", i + 1),
            Self::Law(i, j) => write!(f, "fetching law #{} of category #{}", j + 1, i + 1),
            Self::Fallback(i, j) => write!(
                f,
                "fetching full act for law #{} of category #{}",
                j + 1,
                i + 1
            ),
            Self::Done => write!(f, "done"),
        }
    }
}
