//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ds_site::{RenderError, SiteError};
use ds_storage::StorageError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No page at the given URL path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// URL prefix that names no collection.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Asset name that is not in the manifest.
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path}),
            ),
            Self::CollectionNotFound(prefix) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Collection not found", "prefix": prefix}),
            ),
            Self::FileNotFound(name) => (
                StatusCode::NOT_FOUND,
                json!({"error": "File not found", "path": name}),
            ),
            Self::Render(RenderError::PageNotFound { .. }) => (
                StatusCode::NOT_FOUND,
                json!({"error": self.to_string()}),
            ),
            Self::Storage(_) | Self::Site(_) | Self::Json(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
