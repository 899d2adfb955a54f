//! Docs site CLI.
//!
//! Provides commands for:
//! - `serve`: Start the documentation server
//! - `check`: Load all content and report problems
//! - `sitemap`: Write the sitemap
//! - `index`: Push search records to the search endpoint

mod commands;
mod error;
mod output;
mod search;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, IndexArgs, ServeArgs, SitemapArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Docs site - content pipeline and server.
#[derive(Parser)]
#[command(name = "ds", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover docsite.toml).
    #[arg(short, long, global = true, env = "DS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Load all content, build every sidebar and render every page.
    Check(CheckArgs),
    /// Write sitemap.xml.
    Sitemap(SitemapArgs),
    /// Extract search records and push them to the search endpoint.
    Index(IndexArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute(config, VERSION)),
            Err(e) => Err(e.into()),
        },
        Commands::Check(args) => args.execute(config),
        Commands::Sitemap(args) => args.execute(config),
        Commands::Index(args) => args.execute(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
