//! HTML pages.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use ds_site::Resolution;

use crate::handlers::moved_permanently;
use crate::state::AppState;
use crate::template;

/// Handle GET `{base}/`.
pub(crate) async fn get_listing(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(template::listing(&state.site.collections(), &state.chrome()))
}

/// Handle GET `{base}/{*path}` and every unmatched request.
///
/// Pages render, group directories and legacy URLs redirect, everything
/// else gets the 404 page.
pub(crate) async fn get_page(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let path = uri.path();
    match state.site.resolve(path) {
        Resolution::Page { collection, slug } => match state.site.render(collection, &slug) {
            Ok(page) => Html(template::page(&page, &state.chrome())).into_response(),
            // A rebuild removed the page between resolve and render.
            Err(_) => not_found(&state, path),
        },
        Resolution::Redirect(location) => moved_permanently(&location),
        Resolution::NotFound => not_found(&state, path),
    }
}

fn not_found(state: &AppState, path: &str) -> Response {
    tracing::debug!(path, "Page not found");
    (
        StatusCode::NOT_FOUND,
        Html(template::not_found(path, &state.chrome())),
    )
        .into_response()
}
