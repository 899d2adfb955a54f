//! HTTP server for the docs site.
//!
//! Serves rendered HTML pages, a JSON API for pages and navigation, hashed
//! image assets and the sitemap, all from one [`Site`] snapshot. In dev mode
//! content changes trigger a rebuild and connected browsers reload over a
//! WebSocket.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use ds_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         content_dir: PathBuf::from("src/content"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET {base}/                     collection listing
//! GET {base}/{*path}              page, 301 redirect or 404 page
//! GET {base}/_assets/{name}       hashed image, cached forever
//! GET /api/pages/{*path}          page JSON with ETag
//! GET /api/navigation[/{prefix}]  collections or one sidebar
//! GET /sitemap.xml
//! GET /ws/live-reload             reload events (dev mode)
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;
mod template;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use ds_site::{Site, SiteSettings};
use ds_storage::{FsStorage, Storage};
use tokio::sync::broadcast;

pub use error::ServerError;

use crate::state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Content root holding the `doc-*` directories.
    pub content_dir: PathBuf,
    pub site: SiteSettings,
    /// Rebuild on content changes and notify browsers.
    pub live_reload_enabled: bool,
    /// Application version (part of every `ETag`).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            content_dir: PathBuf::from("content"),
            site: SiteSettings::default(),
            live_reload_enabled: false,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the site cannot be loaded or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.content_dir.clone()));
    let site = Arc::new(Site::load(Arc::clone(&storage), config.site)?);

    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(tx);
        manager.start(Arc::clone(&site), storage.as_ref())?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        site,
        live_reload,
        version: config.version,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, content_dir = %config.content_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Site settings from the `[site]` and `[redirects]` sections.
#[must_use]
pub fn site_settings(config: &ds_config::Config) -> SiteSettings {
    let site = &config.site_resolved;
    SiteSettings {
        base_path: site.base_path.clone(),
        site_url: site.site_url.clone(),
        edit_url_base: site.edit_url_base.clone(),
        default_collection: site.default_collection,
        redirects: config.redirects.clone(),
    }
}

/// Create server configuration from the loaded config file.
#[must_use]
pub fn server_config_from_config(config: &ds_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_dir: config.site_resolved.content_dir.clone(),
        site: site_settings(config),
        live_reload_enabled: config.live_reload.enabled,
        version,
    }
}
