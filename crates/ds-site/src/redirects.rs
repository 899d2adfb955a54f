//! Legacy URL redirects.

use std::collections::HashMap;

use ds_content::Collection;

/// Redirect table for URLs that no longer map to a page.
#[derive(Clone, Debug)]
pub struct Redirects {
    base_path: String,
    default_collection: Collection,
    /// Legacy path (slashes trimmed) to target URL.
    table: HashMap<String, String>,
}

impl Redirects {
    /// Create a redirect table.
    ///
    /// Paths below `base_path` whose first segment names no collection are
    /// sent to the same path under `default_collection`.
    pub fn new<I>(base_path: &str, default_collection: Collection, table: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            base_path: base_path.trim_end_matches('/').to_owned(),
            default_collection,
            table: table
                .into_iter()
                .map(|(from, to)| (from.trim_matches('/').to_owned(), to))
                .collect(),
        }
    }

    /// Redirect target for `path`, if any.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<String> {
        if let Some(target) = self.table.get(path.trim_matches('/')) {
            return Some(target.clone());
        }

        let rest = path.strip_prefix(self.base_path.as_str())?;
        if !rest.starts_with('/') {
            return None;
        }
        let rest = rest.trim_matches('/');
        if rest.is_empty() || rest.starts_with('_') {
            return None;
        }
        let known = Collection::ALL.iter().any(|c| {
            let prefix = c.url_prefix();
            rest == prefix
                || rest
                    .strip_prefix(prefix)
                    .is_some_and(|tail| tail.starts_with('/'))
        });
        if known {
            return None;
        }
        Some(format!(
            "{}/{}/{rest}",
            self.base_path,
            self.default_collection.url_prefix()
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
