//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod index;
pub(crate) mod serve;
pub(crate) mod sitemap;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ds_config::{CliSettings, Config};
use ds_site::Site;
use ds_storage::{FsStorage, Storage};

pub(crate) use check::CheckArgs;
pub(crate) use index::IndexArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use sitemap::SitemapArgs;

use crate::error::CliError;

/// Load config, honoring a `--content-dir` override.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    content_dir: Option<PathBuf>,
) -> Result<Config, CliError> {
    let cli_settings = CliSettings {
        content_dir,
        ..CliSettings::default()
    };
    Ok(Config::load(config_path, Some(&cli_settings))?)
}

/// Build the site from the configured content directory.
pub(crate) fn load_site(config: &Config) -> Result<Site, CliError> {
    let storage: Arc<dyn Storage> =
        Arc::new(FsStorage::new(config.site_resolved.content_dir.clone()));
    Ok(Site::load(storage, ds_server::site_settings(config))?)
}
