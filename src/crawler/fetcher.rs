//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler and the on-demand
//! extractor:
//! - Building the HTTP client from configuration
//! - GET requests that succeed only on HTTP 200
//! - Classifying failures into status and transport errors
//!
//! There is no retry and, unless configured, no timeout.

use crate::config::Config;
use crate::crawler::encoding::decode_html;
use crate::FetchError;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code (always 200)
    pub status: u16,

    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,

    /// Raw response body, still in the page's own encoding
    pub body: Bytes,
}

impl RawPage {
    /// The body decoded to text using the page's declared charset
    pub fn text(&self) -> String {
        decode_html(&self.body, self.content_type.as_deref())
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy. A user agent is
/// only set when a `[user-agent]` section is configured, and a timeout only
/// when `request-timeout-secs` is set.
///
/// # Example
///
/// ```no_run
/// use statute_harvester::config::Config;
/// use statute_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.header_value());
    }

    if let Some(secs) = config.crawler.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Page fetcher shared by the crawler and the server
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL with a plain GET
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 | `Ok(RawPage)` |
    /// | Any other status | `FetchError::Status` |
    /// | DNS, connection, TLS or body read failure | `FetchError::Transport` |
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(RawPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
