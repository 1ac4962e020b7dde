//! Statute-Harvester main entry point
//!
//! This is the command-line interface for the statute crawler and the
//! on-demand text extractor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use statute_harvester::config::{load_config_with_hash, Config, FetchErrorPolicy};
use statute_harvester::crawler::harvest;
use statute_harvester::output::{print_statistics, CrawlStatistics};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Statute-Harvester: crawls a legislative statute index into a JSON corpus
///
/// The `crawl` command walks the statutes index, every category and every
/// law, and writes a single JSON file mapping law names to their text.
/// The `serve` command starts an HTTP endpoint returning the visible text of
/// any page.
#[derive(Parser, Debug)]
#[command(name = "statute-harvester")]
#[command(version)]
#[command(about = "Crawls legislative statutes into a JSON corpus", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the statutes and write the corpus
    Crawl {
        /// Override the corpus output path
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Override what happens when a page cannot be fetched
        #[arg(long, value_enum)]
        on_fetch_error: Option<FetchErrorPolicy>,

        /// Validate config and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the on-demand page text extractor
    Serve {
        /// Override the listen address
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            output,
            on_fetch_error,
            dry_run,
        } => {
            let mut config = config;
            if let Some(output) = output {
                config.output.corpus_path = output.display().to_string();
            }
            if let Some(policy) = on_fetch_error {
                config.crawler.on_fetch_error = policy;
            }

            if dry_run {
                handle_dry_run(&config);
                Ok(())
            } else {
                handle_crawl(&config).await
            }
        }
        Command::Serve { bind } => {
            let addr = match bind {
                Some(addr) => addr,
                None => config
                    .server
                    .bind
                    .parse::<SocketAddr>()
                    .with_context(|| format!("invalid bind address {}", config.server.bind))?,
            };
            statute_harvester::server::serve(&config, addr).await?;
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("statute_harvester=info,warn"),
            1 => EnvFilter::new("statute_harvester=debug,tower_http=debug,info"),
            2 => EnvFilter::new("statute_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Statute-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Statutes index: {}", config.crawler.statutes_url);
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Link prefix: {}", config.crawler.link_prefix);
    println!("  Fallback link text: {}", config.crawler.fallback_link_text);
    println!("  On fetch error: {:?}", config.crawler.on_fetch_error);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nSelectors:");
    println!("  Categories: {}", config.selectors.categories);
    println!("  Laws: {}", config.selectors.laws);
    println!("  Content: {}", config.selectors.content);

    println!("\nUser Agent:");
    match &config.user_agent {
        Some(user_agent) => println!("  {}", user_agent.header_value()),
        None => println!("  (HTTP client default)"),
    }

    println!("\nOutput:");
    println!("  Corpus: {}", config.output.corpus_path);
    println!("  Pretty: {}", config.output.pretty);

    println!("\nSupplementary Pages ({}):", config.supplements.len());
    for entry in &config.supplements {
        println!("  - {} ({})", entry.name, entry.url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// The corpus is only written after the whole crawl succeeded; a fatal
/// fetch error returns early and leaves no file behind.
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl from {}", config.crawler.statutes_url);

    match harvest(config).await {
        Ok(state) => {
            print_statistics(&CrawlStatistics::from_state(&state));
            tracing::info!(
                "Crawl completed successfully, corpus written to {}",
                config.output.corpus_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed, no corpus written: {}", e);
            Err(e.into())
        }
    }
}
