//! URL ↔ (collection, slug) mapping.

use std::collections::HashMap;

use ds_content::{Collection, ContentIndex};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::sidebar::Sidebar;

/// Outcome of resolving a request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Page { collection: Collection, slug: String },
    /// Permanent redirect to another URL.
    Redirect(String),
    NotFound,
}

/// Characters escaped in a path segment: everything but RFC 3986 unreserved.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode each `/`-separated segment of a slug.
#[must_use]
pub fn encode_slug(slug: &str) -> String {
    slug.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL of a page, with slug segments percent-encoded.
///
/// The collection root page (empty slug) lives at the collection prefix.
#[must_use]
pub fn page_href(base_path: &str, collection: Collection, slug: &str) -> String {
    let base = base_path.trim_end_matches('/');
    if slug.is_empty() {
        format!("{base}/{}", collection.url_prefix())
    } else {
        format!("{base}/{}/{}", collection.url_prefix(), encode_slug(slug))
    }
}

/// Splits request paths into collection and slug.
#[derive(Clone, Debug)]
pub struct Router {
    base_path: String,
    /// Collections by URL prefix, longest prefix first.
    prefixes: Vec<Collection>,
}

impl Router {
    #[must_use]
    pub fn new(base_path: &str) -> Self {
        let mut prefixes = Collection::ALL.to_vec();
        prefixes.sort_by_key(|c| std::cmp::Reverse(c.url_prefix().len()));
        Self {
            base_path: base_path.trim_end_matches('/').to_owned(),
            prefixes,
        }
    }

    /// Base path without a trailing slash (empty when serving at the root).
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn href(&self, collection: Collection, slug: &str) -> String {
        page_href(&self.base_path, collection, slug)
    }

    /// Path below the base path with slashes trimmed, or `None` if `path`
    /// is outside the base path.
    #[must_use]
    pub fn strip_base<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.base_path.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(rest.trim_matches('/'))
    }

    /// Collection and slug for `path`, using the longest matching prefix.
    #[must_use]
    pub fn split<'p>(&self, path: &'p str) -> Option<(Collection, &'p str)> {
        let rest = self.strip_base(path)?;
        self.prefixes.iter().find_map(|&collection| {
            let prefix = collection.url_prefix();
            let slug = rest.strip_prefix(prefix)?;
            if slug.is_empty() {
                Some((collection, ""))
            } else {
                slug.strip_prefix('/').map(|slug| (collection, slug))
            }
        })
    }

    /// Resolve `path` to a page by exact slug lookup.
    ///
    /// `path` is the raw request path; it is percent-decoded before the
    /// lookup. A group directory without an index page redirects to the
    /// first page below it.
    #[must_use]
    pub fn resolve(
        &self,
        path: &str,
        index: &ContentIndex,
        sidebars: &HashMap<Collection, Sidebar>,
    ) -> Resolution {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let Some((collection, slug)) = self.split(&decoded) else {
            return Resolution::NotFound;
        };
        if index.get(collection, slug).is_some() {
            return Resolution::Page {
                collection,
                slug: slug.to_owned(),
            };
        }
        sidebars
            .get(&collection)
            .and_then(|sidebar| sidebar.landings.get(slug))
            .map_or(Resolution::NotFound, |href| {
                Resolution::Redirect(href.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use ds_storage::SourceFile;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sidebar::build_sidebar;

    fn fixture() -> (ContentIndex, HashMap<Collection, Sidebar>) {
        let index = ContentIndex::load(&[
            SourceFile::new("doc-surrealql/index.mdx", "# SurrealQL"),
            SourceFile::new("doc-surrealql/statements/select.mdx", "# SELECT"),
            SourceFile::new("doc-sdk-rust/index.mdx", "# Rust"),
            SourceFile::new("doc-sdk-rust/methods/query.mdx", "# Query"),
            SourceFile::new("doc-cloud/getting started.mdx", "# Getting started"),
        ])
        .unwrap();
        let sidebars = index
            .collections()
            .map(|c| (c, build_sidebar(&index, c, "/docs")))
            .collect();
        (index, sidebars)
    }

    fn page(collection: Collection, slug: &str) -> Resolution {
        Resolution::Page {
            collection,
            slug: slug.to_owned(),
        }
    }

    #[test]
    fn test_page_href() {
        assert_eq!(page_href("/docs", Collection::Surrealql, ""), "/docs/surrealql");
        assert_eq!(
            page_href("/docs/", Collection::SdkRust, "methods/query"),
            "/docs/sdk/rust/methods/query"
        );
        assert_eq!(page_href("", Collection::Cloud, "x"), "/cloud/x");
        assert_eq!(
            page_href("/docs", Collection::Cloud, "billing/getting started?"),
            "/docs/cloud/billing/getting%20started%3F"
        );
        assert_eq!(encode_slug("café/a_b-c.d~e"), "caf%C3%A9/a_b-c.d~e");
    }

    #[test]
    fn test_split() {
        let router = Router::new("/docs");
        assert_eq!(router.split("/docs/surrealql"), Some((Collection::Surrealql, "")));
        assert_eq!(
            router.split("/docs/surrealql/statements/select/"),
            Some((Collection::Surrealql, "statements/select"))
        );
        assert_eq!(
            router.split("/docs/sdk/rust/methods/query"),
            Some((Collection::SdkRust, "methods/query"))
        );
        assert_eq!(router.split("/docs/surrealqlx"), None);
        assert_eq!(router.split("/docsx/surrealql"), None);
        assert_eq!(router.split("/docs/sdk"), None);
        assert_eq!(router.split("/other"), None);
    }

    #[test]
    fn test_split_at_root_base() {
        let router = Router::new("/");
        assert_eq!(router.base_path(), "");
        assert_eq!(router.split("/cloud/x"), Some((Collection::Cloud, "x")));
    }

    #[test]
    fn test_resolve_pages() {
        let (index, sidebars) = fixture();
        let router = Router::new("/docs");
        assert_eq!(
            router.resolve("/docs/surrealql", &index, &sidebars),
            page(Collection::Surrealql, "")
        );
        assert_eq!(
            router.resolve("/docs/sdk/rust/methods/query/", &index, &sidebars),
            page(Collection::SdkRust, "methods/query")
        );
    }

    #[test]
    fn test_resolve_exact_match_only() {
        let (index, sidebars) = fixture();
        let router = Router::new("/docs");
        assert_eq!(
            router.resolve("/docs/surrealql/statements/sel", &index, &sidebars),
            Resolution::NotFound
        );
        assert_eq!(
            router.resolve("/docs/surrealdb", &index, &sidebars),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_resolve_group_without_index_redirects() {
        let (index, sidebars) = fixture();
        let router = Router::new("/docs");
        assert_eq!(
            router.resolve("/docs/surrealql/statements", &index, &sidebars),
            Resolution::Redirect("/docs/surrealql/statements/select".to_owned())
        );
    }

    #[test]
    fn test_resolve_percent_encoded_sidebar_href() {
        let (index, sidebars) = fixture();
        let router = Router::new("/docs");
        let href = sidebars[&Collection::Cloud]
            .items
            .iter()
            .find_map(|item| item.href.clone())
            .unwrap();
        assert_eq!(href, "/docs/cloud/getting%20started");
        assert_eq!(
            router.resolve(&href, &index, &sidebars),
            page(Collection::Cloud, "getting started")
        );
    }
}
