//! On-demand page text extractor
//!
//! A single read-only endpoint, `GET /scrape?url=<url>`, that fetches the
//! given page and answers with its visible text as `text/plain`. Requests
//! are independent; the only thing handlers share is the HTTP client.
//! Cross-origin requests are allowed from anywhere.

mod error;

pub use error::AppError;

use crate::config::Config;
use crate::crawler::{Document, Fetcher};
use crate::Result;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    fetcher: Fetcher,
}

impl AppState {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

/// Query string of `/scrape`
#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub url: String,
}

/// Build the axum Router with the extractor endpoints.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/scrape", get(scrape))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the extractor server on the given address.
///
/// Runs until the process is stopped.
pub async fn serve(config: &Config, addr: SocketAddr) -> Result<()> {
    let fetcher = Fetcher::from_config(config)?;
    let app = router(AppState::new(fetcher));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Extractor listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

/// Fetches `url` and returns the page's visible text.
async fn scrape(
    State(state): State<AppState>,
    Query(params): Query<ScrapeParams>,
) -> std::result::Result<String, AppError> {
    tracing::info!("Extracting text from {}", params.url);
    let page = state.fetcher.fetch(&params.url).await?;
    Ok(Document::from_page(&page).text())
}
