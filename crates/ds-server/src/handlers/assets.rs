//! Hashed image assets and the sitemap.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// Served names carry a content hash, so they never change.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Handle GET `{base}/_assets/{name}`.
pub(crate) async fn get_asset(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let asset = state
        .site
        .asset(&name)?
        .ok_or(ServerError::FileNotFound(name))?;
    let mime = mime_guess::from_path(&asset.path).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, IMMUTABLE.to_owned()),
        ],
        asset.bytes,
    )
        .into_response())
}

/// Handle GET /sitemap.xml.
pub(crate) async fn get_sitemap(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let xml = state.site.sitemap_xml()?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
