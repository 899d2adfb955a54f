//! Navigation API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use ds_content::Collection;
use ds_site::{CollectionSummary, SidebarItem};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct CollectionsResponse {
    collections: Vec<CollectionSummary>,
}

/// Response for GET /api/navigation/{prefix}.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    collection: Collection,
    label: &'static str,
    items: Vec<SidebarItem>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_collections(
    State(state): State<Arc<AppState>>,
) -> Json<CollectionsResponse> {
    Json(CollectionsResponse {
        collections: state.site.collections(),
    })
}

/// Handle GET /api/navigation/{*prefix}.
///
/// The prefix is the collection's URL prefix, e.g. `surrealql` or `sdk/rust`.
pub(crate) async fn get_navigation(
    Path(prefix): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let prefix = prefix.trim_matches('/');
    let collection = Collection::from_url_prefix(prefix)
        .ok_or_else(|| ServerError::CollectionNotFound(prefix.to_owned()))?;
    let items = state
        .site
        .sidebar(collection)
        .ok_or_else(|| ServerError::CollectionNotFound(prefix.to_owned()))?;

    Ok(Json(NavigationResponse {
        collection,
        label: collection.label(),
        items,
    }))
}
