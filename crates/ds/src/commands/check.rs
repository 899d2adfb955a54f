//! `ds check` command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use ds_site::{CollectionSummary, Site};

use crate::commands::{load_config, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Content directory holding the doc-* collections (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Fail when any warning is reported.
    #[arg(long)]
    strict: bool,
}

/// Outcome of checking a loaded site.
#[derive(Debug)]
pub(crate) struct CheckReport {
    pub(crate) collections: Vec<CollectionSummary>,
    pub(crate) pages: usize,
    /// Sidebar and render warnings, each prefixed with where it came from.
    pub(crate) warnings: Vec<String>,
}

impl CheckArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let start = Instant::now();

        let config = load_config(config_path, self.content_dir)?;
        output.info(&format!(
            "Checking {}",
            config.site_resolved.content_dir.display()
        ));
        let site = load_site(&config)?;
        let report = check_site(&site);

        output.heading("Collections");
        for summary in &report.collections {
            output.row(summary.label, summary.pages, &summary.href);
        }
        output.warnings(&report.warnings);

        let summary = format!(
            "{} pages in {} collections, {} warnings ({:.0} ms)",
            report.pages,
            report.collections.len(),
            report.warnings.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        if self.strict && !report.warnings.is_empty() {
            return Err(CliError::Validation(summary));
        }
        output.success(&summary);
        Ok(())
    }
}

/// Render every page and gather all warnings.
pub(crate) fn check_site(site: &Site) -> CheckReport {
    let snapshot = site.snapshot();
    let mut warnings: Vec<String> = snapshot.warnings().map(ToOwned::to_owned).collect();
    let mut pages = 0;

    for collection in snapshot.index().collections() {
        for entry in snapshot.index().entries(collection) {
            pages += 1;
            match site.render(collection, &entry.slug) {
                Ok(page) => warnings.extend(
                    page.warnings
                        .into_iter()
                        .map(|w| format!("{}: {w}", entry.file_path.display())),
                ),
                Err(e) => warnings.push(e.to_string()),
            }
        }
    }

    CheckReport {
        collections: site.collections(),
        pages,
        warnings,
    }
}
