//! Statute-Harvester: a legislative statute crawler
//!
//! This crate walks a legislative website's statute index (categories, then
//! individual laws, then an optional "full act" page), collects the visible
//! text of every law into a single corpus and writes it out as JSON. It also
//! exposes a small HTTP endpoint that returns the visible text of any page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Statute-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed while {phase}: {source}")]
    Fetch {
        phase: state::CrawlPhase,
        source: FetchError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns the crawl phase a fetch failure happened in, if any
    pub fn phase(&self) -> Option<state::CrawlPhase> {
        match self {
            Self::Fetch { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Page fetch errors
///
/// Anything other than an HTTP 200 is a failure. Transport problems (DNS,
/// connection reset, TLS, truncated body) are not classified further.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("error {status}: could not fetch {url}")]
    Status { url: String, status: u16 },

    #[error("transport failure fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL that failed to fetch
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }

    /// The HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Result type alias for Statute-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{Corpus, CrawlPhase, CrawlState, FailureRecord};
pub use crate::url::UrlResolver;
