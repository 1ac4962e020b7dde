use serde::Deserialize;

pub const DEFAULT_STATUTES_URL: &str = "https://www.ilga.gov/legislation/ilcs/ilcs.asp";
pub const DEFAULT_BASE_URL: &str = "https://www.ilga.gov/legislation/ilcs/";
pub const DEFAULT_LINK_PREFIX: &str = "/legislation/ilcs/";
pub const DEFAULT_FALLBACK_LINK_TEXT: &str = "View Entire Act";

/// Main configuration structure for Statute-Harvester
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<UserAgentConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(rename = "supplement", default)]
    pub supplements: Vec<SupplementEntry>,
}

/// What the crawler does when a page cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Stop the whole crawl and write nothing
    #[default]
    Abort,
    /// Record the failed fetch and move on to the next item
    Skip,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Top-level statutes index page
    #[serde(rename = "statutes-url")]
    pub statutes_url: String,

    /// Base URL that every link on the site is joined onto
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path prefix stripped from hrefs before joining
    #[serde(rename = "link-prefix")]
    pub link_prefix: String,

    /// Exact text of the anchor leading to the full act
    #[serde(rename = "fallback-link-text")]
    pub fallback_link_text: String,

    #[serde(rename = "on-fetch-error")]
    pub on_fetch_error: FetchErrorPolicy,

    /// Per-request timeout in seconds; unset means wait forever
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            statutes_url: DEFAULT_STATUTES_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            fallback_link_text: DEFAULT_FALLBACK_LINK_TEXT.to_string(),
            on_fetch_error: FetchErrorPolicy::Abort,
            request_timeout_secs: None,
        }
    }
}

/// CSS selectors used at each level of the traversal
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Category links on the statutes index
    pub categories: String,

    /// Law links on a category page
    pub laws: String,

    /// Content nodes on a law (or full act) page
    pub content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            categories: "center > table a".to_string(),
            laws: "table ul a".to_string(),
            content: "p table".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON corpus file
    #[serde(rename = "corpus-path")]
    pub corpus_path: String,

    /// Pretty-print the corpus instead of writing it on one line
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            corpus_path: "laws.json".to_string(),
            pretty: false,
        }
    }
}

/// On-demand extractor server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// A standalone page stored whole in the corpus under a fixed name
#[derive(Debug, Clone, Deserialize)]
pub struct SupplementEntry {
    /// Corpus key
    pub name: String,

    /// Page to fetch
    pub url: String,
}
