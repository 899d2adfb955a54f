//! Application state shared across all handlers.

use std::sync::Arc;

use ds_site::Site;

use crate::live_reload::LiveReloadManager;
use crate::template::Chrome;

pub(crate) struct AppState {
    pub(crate) site: Arc<Site>,
    /// Present in dev mode.
    pub(crate) live_reload: Option<LiveReloadManager>,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}

impl AppState {
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }

    /// Page chrome shared by every HTML response.
    pub(crate) fn chrome(&self) -> Chrome<'_> {
        Chrome {
            base_path: self.site.router().base_path(),
            live_reload: self.live_reload_enabled(),
        }
    }
}
