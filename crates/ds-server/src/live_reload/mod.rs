//! Dev-mode rebuilds and browser reload notifications.

mod manager;
mod websocket;

pub(crate) use manager::{LiveReloadManager, ReloadEvent};
pub(crate) use websocket::{script, ws_handler};
