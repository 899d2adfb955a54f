//! `ds sitemap` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::commands::{load_config, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sitemap command.
#[derive(Args)]
pub(crate) struct SitemapArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Content directory holding the doc-* collections (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

impl SitemapArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let config = load_config(config_path, self.content_dir)?;
        let site = load_site(&config)?;
        let xml = site.sitemap_xml()?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, xml)?;
                Output::new().success(&format!(
                    "Wrote {} URLs to {}",
                    site.canonical_urls().len(),
                    path.display()
                ));
            }
            None => std::io::stdout().lock().write_all(xml.as_bytes())?,
        }
        Ok(())
    }
}
