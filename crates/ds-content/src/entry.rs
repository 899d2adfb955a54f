//! Content entries and slug derivation.

use std::path::{Component, Path, PathBuf};

use crate::collection::Collection;
use crate::frontmatter::Frontmatter;

/// One parsed content file.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub collection: Collection,
    /// `/`-joined path within the collection, without extension or trailing
    /// `index`. The collection root page has the empty slug.
    pub slug: String,
    /// Source path relative to the content root.
    pub file_path: PathBuf,
    pub data: Frontmatter,
    /// Markdown body without the frontmatter block.
    pub body: String,
}

impl Entry {
    /// Page title: frontmatter `title`, else derived from the slug.
    #[must_use]
    pub fn title(&self) -> String {
        if let Some(title) = &self.data.title {
            return title.clone();
        }
        match self.slug.rsplit('/').next() {
            Some(segment) if !segment.is_empty() => titlecase_from_slug(segment),
            _ => self.collection.label().to_owned(),
        }
    }

    /// Sidebar text: frontmatter `sidebar_label`, else the title.
    #[must_use]
    pub fn sidebar_label(&self) -> String {
        self.data
            .sidebar_label
            .clone()
            .unwrap_or_else(|| self.title())
    }

    /// Slug of the directory level this entry sits in.
    ///
    /// `None` for the collection root page.
    #[must_use]
    pub fn parent_slug(&self) -> Option<&str> {
        if self.slug.is_empty() {
            return None;
        }
        Some(self.slug.rsplit_once('/').map_or("", |(parent, _)| parent))
    }

    /// Directory containing the source file, relative to the content root.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or(Path::new(""))
    }

    /// Link to the source file in a repository browser.
    #[must_use]
    pub fn edit_url(&self, base: &str) -> String {
        let path = self
            .file_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{path}", base.trim_end_matches('/'))
    }
}

/// Derive a slug from a path relative to the collection directory.
///
/// - `methods/query.mdx` -> `methods/query`
/// - `methods/index.mdx` -> `methods`
/// - `index.mdx` -> `""`
///
/// Returns `None` for paths that are not plain relative file paths.
#[must_use]
pub fn slug_from_path(rel_path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in rel_path.components() {
        match component {
            Component::Normal(s) => segments.push(s.to_str()?.to_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let last = segments.pop()?;
    let stem = last
        .strip_suffix(".mdx")
        .or_else(|| last.strip_suffix(".md"))
        .unwrap_or(&last);
    if stem != "index" {
        segments.push(stem.to_owned());
    }

    Some(segments.join("/"))
}

/// Turn a slug segment into a title: `live-queries` -> `Live Queries`.
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, data: Frontmatter) -> Entry {
        Entry {
            collection: Collection::Surrealql,
            slug: slug.to_owned(),
            file_path: PathBuf::from(format!("doc-surrealql/{slug}.mdx")),
            data,
            body: String::new(),
        }
    }

    #[test]
    fn test_slug_from_path() {
        let slug = |p: &str| slug_from_path(Path::new(p)).unwrap();

        assert_eq!(slug("methods/query.mdx"), "methods/query");
        assert_eq!(slug("methods/index.mdx"), "methods");
        assert_eq!(slug("index.mdx"), "");
        assert_eq!(slug("index.md"), "");
        assert_eq!(slug("guide.md"), "guide");
        assert_eq!(slug("a/b/c.mdx"), "a/b/c");
        assert_eq!(slug("index/index.mdx"), "index");
        assert_eq!(slug("indexing.mdx"), "indexing");
        assert_eq!(slug("./a.mdx"), "a");
    }

    #[test]
    fn test_slug_from_path_is_deterministic() {
        let path = Path::new("statements/define/table.mdx");

        assert_eq!(slug_from_path(path), slug_from_path(path));
    }

    #[test]
    fn test_slug_from_path_rejects_escaping_paths() {
        assert_eq!(slug_from_path(Path::new("../a.mdx")), None);
        assert_eq!(slug_from_path(Path::new("/abs/a.mdx")), None);
        assert_eq!(slug_from_path(Path::new("")), None);
    }

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("live-queries"), "Live Queries");
        assert_eq!(titlecase_from_slug("select"), "Select");
        assert_eq!(titlecase_from_slug("data_types"), "Data Types");
        assert_eq!(titlecase_from_slug(""), "");
    }

    #[test]
    fn test_title_fallbacks() {
        let titled = entry(
            "statements/select",
            Frontmatter {
                title: Some("SELECT statement".to_owned()),
                ..Frontmatter::default()
            },
        );
        let untitled = entry("statements/live-select", Frontmatter::default());
        let root = entry("", Frontmatter::default());

        assert_eq!(titled.title(), "SELECT statement");
        assert_eq!(untitled.title(), "Live Select");
        assert_eq!(root.title(), "SurrealQL");
    }

    #[test]
    fn test_sidebar_label_prefers_label() {
        let e = entry(
            "statements/select",
            Frontmatter {
                title: Some("SELECT statement".to_owned()),
                sidebar_label: Some("SELECT".to_owned()),
                ..Frontmatter::default()
            },
        );

        assert_eq!(e.sidebar_label(), "SELECT");
    }

    #[test]
    fn test_parent_slug() {
        assert_eq!(entry("", Frontmatter::default()).parent_slug(), None);
        assert_eq!(entry("a", Frontmatter::default()).parent_slug(), Some(""));
        assert_eq!(
            entry("a/b/c", Frontmatter::default()).parent_slug(),
            Some("a/b")
        );
    }

    #[test]
    fn test_edit_url() {
        let e = entry("statements/select", Frontmatter::default());

        assert_eq!(
            e.edit_url("https://github.com/org/docs/edit/main/content/"),
            "https://github.com/org/docs/edit/main/content/doc-surrealql/statements/select.mdx"
        );
    }
}
