//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Site routes live under the configured base path; the API, the sitemap and
/// the live reload socket stay at the root.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let base = state.site.router().base_path().to_owned();

    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_collections))
        .route(
            "/api/navigation/{*prefix}",
            get(handlers::navigation::get_navigation),
        )
        .route("/api/pages/{*path}", get(handlers::pages::get_page));

    let mut router = Router::new()
        .merge(api_routes)
        .route("/sitemap.xml", get(handlers::assets::get_sitemap))
        .route(
            &format!("{base}/_assets/{{name}}"),
            get(handlers::assets::get_asset),
        )
        .route(&format!("{base}/"), get(handlers::html::get_listing))
        .route(&format!("{base}/{{*path}}"), get(handlers::html::get_page));
    if !base.is_empty() {
        router = router.route(&base, get(handlers::html::get_listing));
    }

    if state.live_reload_enabled() {
        router = router
            .route("/ws/live-reload", get(live_reload::ws_handler))
            .route(&format!("{base}/_live-reload.js"), get(live_reload::script));
    }

    router
        .fallback(handlers::html::get_page)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::content_security_policy())
                .layer(security::no_sniff())
                .layer(security::deny_framing()),
        )
        .with_state(state)
}
