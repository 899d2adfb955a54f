//! Storage trait and error types.
//!
//! # Path Convention
//!
//! Every path handed out or accepted by a [`Storage`] is relative to the
//! content root and keeps its file extension:
//! - `"doc-surrealql/index.mdx"` - collection root page
//! - `"doc-surrealql/statements/_category_.json"` - category metadata
//! - `"doc-surrealql/statements/img/graph.png"` - image asset

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::event::{ChangeReceiver, WatchHandle};

/// A content or category file with its full text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the content root.
    pub path: PathBuf,
    /// UTF-8 file contents.
    pub contents: String,
}

impl SourceFile {
    /// Create a source file from a path and its contents.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// An image asset referenced from content.
///
/// Contents are not kept in memory; the server reads them on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetFile {
    /// Path relative to the content root.
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the file contents.
    pub hash: String,
}

/// Everything a storage scan produced, in scan order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Markdown, MDX and category files.
    pub sources: Vec<SourceFile>,
    /// Hashed image files.
    pub assets: Vec<AssetFile>,
}

/// Compute the hex-encoded SHA-256 digest of `bytes`.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Path escapes the content root.
    InvalidPath,
    /// File is not valid UTF-8.
    InvalidData,
    /// Change notification could not be set up.
    WatchFailed,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        Self::new(kind).with_source(err).with_path(path)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::WatchFailed => "Watch failed",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Source of documentation content.
///
/// A scan must either return every file or fail; partial results are never
/// handed to the loader.
pub trait Storage: Send + Sync {
    /// Scan all content, category and asset files in deterministic order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if any file cannot be read.
    fn scan(&self) -> Result<ScanResult, StorageError>;

    /// Read raw bytes of a file (used to serve assets).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Start watching for changes.
    ///
    /// The default implementation never yields any change, for backends
    /// without change notification.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if watching cannot be started.
    fn watch(&self) -> Result<(ChangeReceiver, WatchHandle), StorageError> {
        Ok((ChangeReceiver::no_op(), WatchHandle::no_op()))
    }
}
