//! CLI error types.

use ds_config::ConfigError;
use ds_site::SiteError;

use crate::search::SearchError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
