//! Link resolution against the site's fixed base path
//!
//! Statute sites link between pages with hrefs that are already rooted at
//! the statutes directory (`/legislation/ilcs/ilcs4.asp?...`). Resolution
//! drops that directory prefix and appends what is left to the base URL.
//! It is deliberately a string operation: the produced URL must keep the
//! exact shape of the site's paths, including query strings, so no general
//! URL joining is applied.

use crate::config::CrawlerConfig;

/// Turns hrefs found on statute pages into absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base: String,
    prefix: String,
}

impl UrlResolver {
    /// Creates a resolver joining onto `base` after removing `prefix`
    pub fn new(base: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates a resolver from the crawler section of the configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.base_url.clone(), config.link_prefix.clone())
    }

    /// The base URL every resolved link starts with
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolves an href to an absolute URL
    ///
    /// Every occurrence of the prefix is removed and the remainder is
    /// appended verbatim to the base. Hrefs that do not contain the prefix,
    /// and every href when the prefix is empty, are appended as they are.
    ///
    /// # Example
    ///
    /// ```
    /// use statute_harvester::UrlResolver;
    ///
    /// let resolver = UrlResolver::new("https://example.org/legislation/ilcs/", "/legislation/ilcs/");
    /// assert_eq!(
    ///     resolver.resolve("/legislation/ilcs/ch5/art1"),
    ///     "https://example.org/legislation/ilcs/ch5/art1"
    /// );
    /// ```
    pub fn resolve(&self, href: &str) -> String {
        format!("{}{}", self.base, href.replace(&self.prefix, ""))
    }
}
