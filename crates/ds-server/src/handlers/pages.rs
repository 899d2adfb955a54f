//! Pages API endpoint.
//!
//! Returns the full render result of a page as JSON, with an `ETag` for
//! conditional requests.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use ds_site::Resolution;
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::handlers::moved_permanently;
use crate::state::AppState;

/// Handle GET /api/pages/{*path}.
///
/// The rest of the raw request path is the page URL below the base path,
/// e.g. `surrealql/statements/select`. It stays percent-encoded until the
/// site resolves it.
pub(crate) async fn get_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let router = state.site.router();
    let path = uri.path().strip_prefix("/api/pages").unwrap_or_default();
    let url = format!("{}/{}", router.base_path(), path.trim_matches('/'));

    let (collection, slug) = match state.site.resolve(&url) {
        Resolution::Page { collection, slug } => (collection, slug),
        Resolution::Redirect(location) => {
            // Keep API clients in the API when the target is a page.
            let location = router
                .strip_base(&location)
                .map_or(location.clone(), |rest| format!("/api/pages/{rest}"));
            return Ok(moved_permanently(&location));
        }
        Resolution::NotFound => return Err(ServerError::PageNotFound(url)),
    };

    let page = state.site.render(collection, &slug)?;
    let body = serde_json::to_vec(&page)?;
    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(version.as_bytes());
    hasher.update(b":");
    hasher.update(content);
    format!("\"{}\"", &hex::encode(hasher.finalize())[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        let etag1 = compute_etag("1.0.0", b"content");
        let etag2 = compute_etag("1.0.1", b"content");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_includes_content() {
        let etag1 = compute_etag("1.0.0", b"content1");
        let etag2 = compute_etag("1.0.0", b"content2");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", b"content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }
}
