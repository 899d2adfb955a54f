//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod html;
pub(crate) mod navigation;
pub(crate) mod pages;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// 301 to `location`.
pub(crate) fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_owned())],
    )
        .into_response()
}
