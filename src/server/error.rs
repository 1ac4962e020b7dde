//! Maps extractor failures to HTTP responses

use crate::FetchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-level error type that maps to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// The requested page could not be fetched
    #[error("upstream fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let upstream_status = match &self {
            AppError::Fetch(e) => e.status(),
        };
        tracing::warn!("Request failed: {}", self);

        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "upstream_status": upstream_status,
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
