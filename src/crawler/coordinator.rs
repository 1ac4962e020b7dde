//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the three-level traversal:
//! - Fetch the statutes index and collect category links
//! - For each category, fetch its page and collect law links
//! - For each law, extract its content, following the full act link when
//!   the law page itself has none
//!
//! Everything is fetched one page at a time, in document order. Results
//! accumulate in a [`CrawlState`] that is returned when the walk completes.

use crate::config::{Config, FetchErrorPolicy, SupplementEntry};
use crate::crawler::fetcher::{Fetcher, RawPage};
use crate::crawler::parser::{Document, Link, Selectors};
use crate::state::{CrawlPhase, CrawlState};
use crate::url::UrlResolver;
use crate::{HarvestError, Result};

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    resolver: UrlResolver,
    selectors: Selectors,
    statutes_url: String,
    fallback_link_text: String,
    policy: FetchErrorPolicy,
    supplements: Vec<SupplementEntry>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Selectors compiled and HTTP client built
    /// * `Err(HarvestError)` - Invalid selector or client construction failure
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator that fetches through an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Fetcher) -> Result<Self> {
        Ok(Self {
            fetcher,
            resolver: UrlResolver::from_config(&config.crawler),
            selectors: Selectors::from_config(&config.selectors)?,
            statutes_url: config.crawler.statutes_url.clone(),
            fallback_link_text: config.crawler.fallback_link_text.clone(),
            policy: config.crawler.on_fetch_error,
            supplements: config.supplements.clone(),
        })
    }

    /// Runs the crawl to completion
    ///
    /// Under the `abort` policy the first failed fetch ends the run with
    /// `HarvestError::Fetch` and everything gathered so far is dropped.
    /// Laws whose content stays empty are not errors; they end up in
    /// `CrawlState::failures`.
    pub async fn run(&self) -> Result<CrawlState> {
        let mut state = CrawlState::new();

        self.crawl_supplements(&mut state).await?;

        state.enter(CrawlPhase::Index);
        let categories = match self
            .fetch_page(&self.statutes_url, CrawlPhase::Index, &mut state)
            .await?
        {
            Some(page) => Document::from_page(&page).links(&self.selectors.categories),
            None => Vec::new(),
        };
        tracing::info!("Scraping {} categories of law...", categories.len());

        for (i, category) in categories.iter().enumerate() {
            self.crawl_category(i, category, &mut state).await?;
        }

        state.finish();
        tracing::info!(
            "Finished scraping: {} laws from {} categories, {} failed",
            state.laws_visited,
            state.categories_visited,
            state.failures.len()
        );

        Ok(state)
    }

    /// Fetches each configured supplementary page whole
    async fn crawl_supplements(&self, state: &mut CrawlState) -> Result<()> {
        for (i, supplement) in self.supplements.iter().enumerate() {
            let phase = CrawlPhase::Supplement(i);
            state.enter(phase);
            tracing::info!("Scraping supplement {}", supplement.name);

            if let Some(page) = self.fetch_page(&supplement.url, phase, state).await? {
                let text = Document::from_page(&page).text();
                state.record_law(&supplement.name, text);
            }
        }
        Ok(())
    }

    /// Visits one category page and every law listed on it
    async fn crawl_category(&self, i: usize, category: &Link, state: &mut CrawlState) -> Result<()> {
        let Some(href) = category.href.as_deref() else {
            tracing::warn!("Category '{}' has no href, skipping", category.text);
            return Ok(());
        };

        let phase = CrawlPhase::Category(i);
        state.enter(phase);
        let url = self.resolver.resolve(href);
        let Some(page) = self.fetch_page(&url, phase, state).await? else {
            return Ok(());
        };

        let laws = Document::from_page(&page).links(&self.selectors.laws);
        state.categories_visited += 1;
        tracing::info!("Scraping {} laws from {}...", laws.len(), category.text);

        for (j, law) in laws.iter().enumerate() {
            self.crawl_law(i, j, category, law, state).await?;
        }

        Ok(())
    }

    /// Extracts one law, falling back to its full act page when empty
    async fn crawl_law(
        &self,
        i: usize,
        j: usize,
        category: &Link,
        law: &Link,
        state: &mut CrawlState,
    ) -> Result<()> {
        let Some(href) = law.href.as_deref() else {
            tracing::warn!("Law '{}' in {} has no href, skipping", law.text, category.text);
            return Ok(());
        };

        tracing::info!("> scraping {}", law.text);
        let phase = CrawlPhase::Law(i, j);
        state.enter(phase);
        let url = self.resolver.resolve(href);
        let Some(page) = self.fetch_page(&url, phase, state).await? else {
            return Ok(());
        };
        state.laws_visited += 1;

        let (mut content, fallback) = {
            let document = Document::from_page(&page);
            let content = document.content_text(&self.selectors.content);
            let fallback = if content.is_empty() {
                document.find_link_by_text(&self.selectors, &self.fallback_link_text)
            } else {
                None
            };
            (content, fallback)
        };

        if content.is_empty() {
            tracing::info!("> no law content found, searching for more hyperlinks...");

            match fallback.and_then(|link| link.href) {
                Some(fallback_href) => {
                    tracing::info!("> full law found");
                    let phase = CrawlPhase::Fallback(i, j);
                    state.enter(phase);
                    let fallback_url = self.resolver.resolve(&fallback_href);
                    if let Some(page) = self.fetch_page(&fallback_url, phase, state).await? {
                        state.fallbacks_followed += 1;
                        content = Document::from_page(&page).content_text(&self.selectors.content);
                    }
                }
                None => {
                    tracing::warn!("> full law not found for {}: {}", category.text, law.text);
                    state.record_failure(&category.text, &law.text);
                }
            }
        }

        state.record_law(&law.text, content);
        Ok(())
    }

    /// Fetches a page, applying the fetch-error policy
    ///
    /// Returns `Ok(None)` when the fetch failed and was skipped.
    async fn fetch_page(
        &self,
        url: &str,
        phase: CrawlPhase,
        state: &mut CrawlState,
    ) -> Result<Option<RawPage>> {
        match self.fetcher.fetch(url).await {
            Ok(page) => Ok(Some(page)),
            Err(source) => {
                if self.policy == FetchErrorPolicy::Skip && !phase.is_always_fatal() {
                    tracing::warn!("Skipping {} after failed fetch: {}", url, source);
                    state.record_skip(phase, url, source.to_string());
                    Ok(None)
                } else {
                    tracing::error!("Aborting crawl while {}: {}", phase, source);
                    Err(HarvestError::Fetch { phase, source })
                }
            }
        }
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Returns
///
/// * `Ok(CrawlState)` - Crawl completed, possibly with recoverable failures
/// * `Err(HarvestError)` - A fetch failed under the `abort` policy
pub async fn run_crawl(config: &Config) -> Result<CrawlState> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
