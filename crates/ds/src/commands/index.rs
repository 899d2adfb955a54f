//! `ds index` command implementation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Args;
use ds_site::SearchRecord;

use crate::commands::{load_config, load_site};
use crate::error::CliError;
use crate::output::Output;
use crate::search::SearchClient;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Write records as JSON to this file instead of pushing them.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when the search endpoint rejects the push.
    #[arg(long)]
    strict: bool,

    /// Content directory holding the doc-* collections (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

impl IndexArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(config_path, self.content_dir)?;
        let site = load_site(&config)?;
        let records = site.search_records();

        if let Some(path) = &self.output {
            write_records(path, &records)?;
            output.success(&format!(
                "Wrote {} search records to {}",
                records.len(),
                path.display()
            ));
            return Ok(());
        }

        let search = config.require_search()?;
        output.info(&format!(
            "Pushing {} records to {} ({}/{}.{})",
            records.len(),
            search.url,
            search.namespace,
            search.database,
            search.table
        ));

        match SearchClient::new(search).replace_all(&records) {
            Ok(written) => {
                output.success(&format!("Indexed {written} records"));
                Ok(())
            }
            Err(e) if self.strict => Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "Search indexing failed");
                output.warning(&format!("Search indexing failed, previous index kept: {e}"));
                Ok(())
            }
        }
    }
}

fn write_records(path: &Path, records: &[SearchRecord]) -> Result<(), CliError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_write_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("docsite.toml"), "").unwrap();
        let content = dir.path().join("content/doc-cloud");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("index.md"),
            "# Cloud\n\nManaged hosting.\n\n## Billing\n\nPay per use.\n",
        )
        .unwrap();

        let config = load_config(Some(&dir.path().join("docsite.toml")), None).unwrap();
        let records = load_site(&config).unwrap().search_records();
        let path = dir.path().join("search.json");
        write_records(&path, &records).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let urls: Vec<&str> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls.len(), records.len());
        assert!(urls.contains(&"http://localhost:8080/docs/cloud#billing"));
    }
}
