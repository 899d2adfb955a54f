//! Content-hashed asset URLs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::html::resolve_relative_path;

/// Number of hex characters of the content hash kept in served file names.
const HASH_LEN: usize = 8;

/// Outcome of resolving an image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Absolute, external or data URL, left as written.
    External,
    /// Known asset; the hashed URL to serve it under.
    Resolved(&'a str),
    /// Relative reference to a file that isn't among the assets.
    Missing,
}

/// Maps asset source paths to hashed, immutable URLs and back.
///
/// An asset at `doc-surrealdb/img/logo.png` with content hash `1a2b3c4d...`
/// is served as `{base_url}/logo.1a2b3c4d.png`.
#[derive(Clone, Debug, Default)]
pub struct AssetManifest {
    base_url: String,
    urls: HashMap<String, String>,
    sources: HashMap<String, PathBuf>,
}

impl AssetManifest {
    /// Create an empty manifest serving under `base_url` (e.g. `/docs/_assets`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            urls: HashMap::new(),
            sources: HashMap::new(),
        }
    }

    /// Register an asset by content-root-relative path and hex content hash.
    pub fn insert(&mut self, path: &Path, hash: &str) {
        let file_name = served_name(path, hash);
        let url = format!("{}/{file_name}", self.base_url);
        self.urls.insert(key(path), url);
        self.sources.insert(file_name, path.to_path_buf());
    }

    /// Hashed URL for a content-root-relative asset path.
    #[must_use]
    pub fn url(&self, path: &Path) -> Option<&str> {
        self.urls.get(&key(path)).map(String::as_str)
    }

    /// Source path for a served file name such as `logo.1a2b3c4d.png`.
    #[must_use]
    pub fn source(&self, served_name: &str) -> Option<&Path> {
        self.sources.get(served_name).map(PathBuf::as_path)
    }

    /// Resolve an image `src` written in a file located in `from_dir`.
    #[must_use]
    pub fn resolve(&self, src: &str, from_dir: &Path) -> ImageRef<'_> {
        if src.starts_with('/') || src.starts_with("data:") || src.contains("://") {
            return ImageRef::External;
        }
        let path = src.split(['?', '#']).next().unwrap_or(src);
        let Some(resolved) = resolve_relative_path(path, &key(from_dir)) else {
            return ImageRef::Missing;
        };
        match self.urls.get(&resolved) {
            Some(url) => ImageRef::Resolved(url),
            None => ImageRef::Missing,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn key(path: &Path) -> String {
    path.components()
        .filter_map(|c| c.as_os_str().to_str())
        .filter(|c| *c != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn served_name(path: &Path, hash: &str) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("asset");
    let hash = hash.get(..HASH_LEN).unwrap_or(hash);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{hash}.{ext}"),
        None => format!("{stem}.{hash}"),
    }
}
