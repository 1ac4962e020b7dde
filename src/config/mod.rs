//! Configuration module for Statute-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys have defaults pointing at the Illinois Compiled Statutes, so the
//! crawler also runs without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use statute_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling from: {}", config.crawler.statutes_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetchErrorPolicy, OutputConfig, SelectorConfig, ServerConfig,
    SupplementEntry, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
