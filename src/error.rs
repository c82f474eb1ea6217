//! Error type shared by the search pipeline and the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result alias for everything that talks to the upstream catalog.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while configuring, authorizing or running a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Missing or invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// The client credentials exchange failed or returned no token
    #[error("authorization with upstream failed: {0}")]
    Auth(String),

    /// The inbound query could not be turned into an upstream query
    #[error("invalid query: {0}")]
    Query(String),

    /// Upstream answered 404 for a by-id lookup
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream answered with any other non-success status
    #[error("upstream returned status {status}")]
    Status { status: u16 },

    /// Network or transport error
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream body was not the expected JSON
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// HTTP status the proxy answers with when this error reaches a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Query(_) => StatusCode::BAD_REQUEST,
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::Auth(_) => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::Status { .. } | SearchError::Http(_) | SearchError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "search failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
