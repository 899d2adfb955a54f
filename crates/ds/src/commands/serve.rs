//! `ds serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use ds_config::{CliSettings, Config};
use ds_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Content directory holding the doc-* collections (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not rebuild on content changes.
    #[arg(long)]
    no_watch: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(
        self,
        config_path: Option<&Path>,
        version: &str,
    ) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            content_dir: self.content_dir,
            live_reload_enabled: self.no_watch.then_some(false),
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on http://{}:{}{}/",
            config.server.host, config.server.port, config.site_resolved.base_path
        ));
        output.info(&format!(
            "Content directory: {}",
            config.site_resolved.content_dir.display()
        ));
        if config.live_reload.enabled {
            output.info("Live reload: enabled");
        } else {
            output.info("Live reload: disabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
