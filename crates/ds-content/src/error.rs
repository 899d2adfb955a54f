//! Content loading errors.
//!
//! Every variant is fatal for the build and names the offending file.

use std::path::PathBuf;

use ds_storage::StorageError;

use crate::collection::Collection;

/// Error raised while building the content index.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Frontmatter is malformed YAML or violates the collection schema.
    #[error("Invalid frontmatter in {}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A `---` block was opened but never closed.
    #[error("Unterminated frontmatter block in {}", .path.display())]
    UnterminatedFrontmatter { path: PathBuf },

    /// Two files resolve to the same slug in one collection.
    #[error(
        "Duplicate slug \"{slug}\" in {collection}: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        collection: Collection,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A category file is malformed.
    #[error("Invalid category metadata in {}: {source}", .path.display())]
    Category {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The content source could not be scanned.
    #[error("Failed to scan content: {0}")]
    Storage(#[from] StorageError),
}

impl LoadError {
    /// Source file the error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Frontmatter { path, .. }
            | Self::UnterminatedFrontmatter { path }
            | Self::Category { path, .. } => Some(path),
            Self::DuplicateSlug { second, .. } => Some(second),
            Self::Storage(e) => e.path.as_deref(),
        }
    }
}
