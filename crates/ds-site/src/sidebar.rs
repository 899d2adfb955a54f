//! Sidebar tree construction.
//!
//! One level of the tree is built per directory prefix `P`:
//!
//! - entries whose parent slug is `P` become leaves,
//! - directories one segment below `P` that hold pages (at any depth) or
//!   category metadata become groups, with the directory's index page (if
//!   any) as the group link, and children built by recursing into them.
//!
//! Nodes at a level are ordered by position with a stable sort, so equal
//! positions keep the order in which the scan first met them.

use std::collections::{HashMap, HashSet};

use ds_content::{Category, Collection, ContentIndex, Entry, titlecase_from_slug};
use serde::Serialize;

use crate::navigation::flatten;
use crate::routing::page_href;

/// One node of the sidebar tree.
///
/// A leaf has `children: None`; a group always has at least one child.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarItem {
    pub label: String,
    /// Page URL. `None` for a group whose directory has no index page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SidebarItem>>,
}

impl SidebarItem {
    fn leaf(label: String, href: String) -> Self {
        Self {
            label,
            href: Some(href),
            children: None,
        }
    }
}

/// Sidebar of one collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sidebar {
    pub items: Vec<SidebarItem>,
    /// Authoring problems found while building, e.g. stale category files.
    pub warnings: Vec<String>,
    /// First page below each group directory that has no index page,
    /// keyed by the directory's slug.
    pub landings: HashMap<String, String>,
}

/// Build the sidebar of `collection` with hrefs under `base_path`.
#[must_use]
pub fn build_sidebar(index: &ContentIndex, collection: Collection, base_path: &str) -> Sidebar {
    let entries: Vec<&Entry> = index.entries(collection).iter().collect();
    let categories: Vec<&Category> = index.categories(collection).iter().collect();

    let mut builder = Builder {
        index,
        collection,
        base_path,
        landings: HashMap::new(),
    };
    let items = builder.level("", &entries, &categories);

    let warnings = stale_categories(&entries, &categories);
    for warning in &warnings {
        tracing::warn!(collection = %collection, "{warning}");
    }

    Sidebar {
        items,
        warnings,
        landings: builder.landings,
    }
}

struct Builder<'a> {
    index: &'a ContentIndex,
    collection: Collection,
    base_path: &'a str,
    landings: HashMap<String, String>,
}

/// Node of one level, in first-appearance order.
enum Slot<'a> {
    Leaf(&'a Entry),
    Group(&'a str),
}

impl<'a> Builder<'a> {
    /// Build the level below `prefix` from the entries and categories
    /// strictly under it.
    fn level(
        &mut self,
        prefix: &str,
        entries: &[&'a Entry],
        categories: &[&'a Category],
    ) -> Vec<SidebarItem> {
        let mut groups: HashSet<&str> = entries
            .iter()
            .filter_map(|e| relative(prefix, &e.slug))
            .filter_map(|rel| rel.split_once('/').map(|(dir, _)| dir))
            .collect();
        groups.extend(
            categories
                .iter()
                .filter_map(|c| relative(prefix, &c.dir))
                .filter(|rel| !rel.contains('/')),
        );

        let mut slots = Vec::new();
        let mut seen = HashSet::new();
        for &entry in entries {
            if prefix.is_empty() && entry.slug.is_empty() {
                slots.push(Slot::Leaf(entry));
                continue;
            }
            let Some(rel) = relative(prefix, &entry.slug) else {
                continue;
            };
            let dir = match rel.split_once('/') {
                Some((dir, _)) => dir,
                None if groups.contains(rel) => rel,
                None => {
                    slots.push(Slot::Leaf(entry));
                    continue;
                }
            };
            if seen.insert(dir) {
                slots.push(Slot::Group(dir));
            }
        }
        for category in categories {
            if let Some(dir) = relative(prefix, &category.dir)
                && !dir.contains('/')
                && seen.insert(dir)
            {
                slots.push(Slot::Group(dir));
            }
        }

        let mut nodes: Vec<(f64, SidebarItem)> = slots
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Leaf(entry) => Some(self.leaf(entry)),
                Slot::Group(dir) => self.group(prefix, dir, entries, categories),
            })
            .collect();
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
        nodes.into_iter().map(|(_, item)| item).collect()
    }

    fn leaf(&self, entry: &Entry) -> (f64, SidebarItem) {
        let href = page_href(self.base_path, self.collection, &entry.slug);
        let position = entry.data.sidebar_position.unwrap_or(0.0);
        (position, SidebarItem::leaf(entry.sidebar_label(), href))
    }

    fn group(
        &mut self,
        prefix: &str,
        dir: &str,
        entries: &[&'a Entry],
        categories: &[&'a Category],
    ) -> Option<(f64, SidebarItem)> {
        let path = if prefix.is_empty() {
            dir.to_owned()
        } else {
            format!("{prefix}/{dir}")
        };
        let index_page = self.index.get(self.collection, &path);
        let meta = self.index.category(self.collection, &path);

        let label = meta
            .and_then(|m| m.sidebar_label.clone())
            .or_else(|| index_page.map(Entry::sidebar_label))
            .unwrap_or_else(|| titlecase_from_slug(dir));
        let position = meta
            .and_then(|m| m.sidebar_position)
            .or_else(|| index_page.and_then(|e| e.data.sidebar_position))
            .unwrap_or(0.0);
        let href = index_page.map(|e| page_href(self.base_path, self.collection, &e.slug));

        let below: Vec<&Entry> = entries
            .iter()
            .filter(|e| is_under(&path, &e.slug))
            .copied()
            .collect();
        let below_categories: Vec<&Category> = categories
            .iter()
            .filter(|c| is_under(&path, &c.dir))
            .copied()
            .collect();
        let children = self.level(&path, &below, &below_categories);

        if children.is_empty() {
            // Groups without pages are reported once as stale categories.
            return href.map(|href| (position, SidebarItem::leaf(label, href)));
        }
        if href.is_none()
            && let Some(first) = flatten(&children).into_iter().find_map(|i| i.href.clone())
        {
            self.landings.insert(path, first);
        }
        Some((
            position,
            SidebarItem {
                label,
                href,
                children: Some(children),
            },
        ))
    }
}

/// Category files whose directory holds no pages.
fn stale_categories(entries: &[&Entry], categories: &[&Category]) -> Vec<String> {
    categories
        .iter()
        .filter(|c| !c.dir.is_empty())
        .filter(|c| {
            !entries
                .iter()
                .any(|e| e.slug == c.dir || is_under(&c.dir, &e.slug))
        })
        .map(|c| {
            format!(
                "Category metadata {} has no pages in its directory",
                c.file_path.display()
            )
        })
        .collect()
}

/// Part of `slug` below `prefix`, or `None` if it isn't strictly below.
fn relative<'s>(prefix: &str, slug: &'s str) -> Option<&'s str> {
    if prefix.is_empty() {
        return (!slug.is_empty()).then_some(slug);
    }
    slug.strip_prefix(prefix)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
}

fn is_under(dir: &str, slug: &str) -> bool {
    relative(dir, slug).is_some()
}

#[cfg(test)]
mod tests {
    use ds_storage::SourceFile;
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(path: &str, frontmatter: &str) -> SourceFile {
        SourceFile::new(path, format!("---\n{frontmatter}\n---\nBody\n"))
    }

    fn sidebar(sources: Vec<SourceFile>) -> Sidebar {
        let index = ContentIndex::load(&sources).unwrap();
        build_sidebar(&index, Collection::Surrealql, "/docs")
    }

    fn labels(items: &[SidebarItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_leaves_sorted_by_position() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/a.mdx", "title: A\nsidebar_position: 2"),
            page("doc-surrealql/b.mdx", "title: B\nsidebar_position: 1"),
            page("doc-surrealql/c.mdx", "title: C"),
        ]);
        // Unset position sorts as 0.
        assert_eq!(labels(&sidebar.items), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_equal_positions_keep_scan_order() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/zeta.mdx", "title: Zeta"),
            page("doc-surrealql/alpha.mdx", "title: Alpha"),
            page("doc-surrealql/mid.mdx", "title: Mid\nsidebar_position: 0"),
            page("doc-surrealql/beta.mdx", "title: Beta"),
        ]);
        assert_eq!(labels(&sidebar.items), vec!["Zeta", "Alpha", "Mid", "Beta"]);
    }

    #[test]
    fn test_leaf_href_and_label() {
        let sidebar = sidebar(vec![page(
            "doc-surrealql/datamodel.mdx",
            "title: Data model\nsidebar_label: Model",
        )]);
        assert_eq!(
            sidebar.items,
            vec![SidebarItem::leaf(
                "Model".to_owned(),
                "/docs/surrealql/datamodel".to_owned()
            )]
        );
    }

    #[test]
    fn test_group_with_index_page() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/statements/index.mdx", "title: Statements"),
            page("doc-surrealql/statements/select.mdx", "title: SELECT"),
            page("doc-surrealql/statements/delete.mdx", "title: DELETE"),
        ]);

        assert_eq!(sidebar.items.len(), 1);
        let group = &sidebar.items[0];
        assert_eq!(group.label, "Statements");
        assert_eq!(group.href.as_deref(), Some("/docs/surrealql/statements"));
        assert_eq!(
            labels(group.children.as_deref().unwrap()),
            vec!["SELECT", "DELETE"]
        );
        assert!(sidebar.landings.is_empty());
    }

    #[test]
    fn test_group_without_index_has_landing() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/functions/math.mdx", "title: Math\nsidebar_position: 2"),
            page("doc-surrealql/functions/array.mdx", "title: Array\nsidebar_position: 1"),
        ]);

        let group = &sidebar.items[0];
        assert_eq!(group.label, "Functions");
        assert_eq!(group.href, None);
        assert_eq!(
            sidebar.landings.get("functions").map(String::as_str),
            Some("/docs/surrealql/functions/array")
        );
    }

    #[test]
    fn test_group_label_and_position_from_category() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/intro.mdx", "title: Intro\nsidebar_position: 1"),
            page("doc-surrealql/statements/index.mdx", "title: Statements\nsidebar_label: Stmts"),
            page("doc-surrealql/statements/select.mdx", "title: SELECT"),
            SourceFile::new(
                "doc-surrealql/statements/_category_.json",
                r#"{"sidebar_label": "All statements", "sidebar_position": 3}"#,
            ),
            page("doc-surrealql/zlast.mdx", "title: Last\nsidebar_position: 2.5"),
        ]);
        assert_eq!(labels(&sidebar.items), vec!["Intro", "Last", "All statements"]);
    }

    #[test]
    fn test_group_label_falls_back_to_index_then_dir() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/statements/index.mdx", "title: Statements\nsidebar_label: Stmts"),
            page("doc-surrealql/statements/select.mdx", "title: SELECT"),
            page("doc-surrealql/data-types/string.mdx", "title: String"),
        ]);
        assert_eq!(labels(&sidebar.items), vec!["Stmts", "Data Types"]);
    }

    #[test]
    fn test_group_position_from_index_page() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/statements/index.mdx", "title: Statements\nsidebar_position: 5"),
            page("doc-surrealql/statements/select.mdx", "title: SELECT"),
            page("doc-surrealql/other.mdx", "title: Other\nsidebar_position: 4"),
        ]);
        assert_eq!(labels(&sidebar.items), vec!["Other", "Statements"]);
    }

    #[test]
    fn test_root_entry_is_leaf() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/index.mdx", "title: Overview"),
            page("doc-surrealql/datamodel.mdx", "title: Data model"),
        ]);
        assert_eq!(
            sidebar.items[0],
            SidebarItem::leaf("Overview".to_owned(), "/docs/surrealql".to_owned())
        );
        assert_eq!(sidebar.items.len(), 2);
    }

    #[test]
    fn test_nested_groups() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/functions/database/index.mdx", "title: Database functions"),
            page("doc-surrealql/functions/database/array.mdx", "title: Array"),
            page("doc-surrealql/functions/script.mdx", "title: Script"),
        ]);

        let functions = &sidebar.items[0];
        let children = functions.children.as_deref().unwrap();
        assert_eq!(labels(children), vec!["Database functions", "Script"]);
        assert_eq!(
            children[0].href.as_deref(),
            Some("/docs/surrealql/functions/database")
        );
        assert_eq!(labels(children[0].children.as_deref().unwrap()), vec!["Array"]);
    }

    #[test]
    fn test_index_only_group_demoted_to_leaf() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/statements/index.mdx", "title: Statements"),
            SourceFile::new(
                "doc-surrealql/statements/_category_.json",
                r#"{"sidebar_label": "Statements"}"#,
            ),
        ]);
        assert_eq!(
            sidebar.items,
            vec![SidebarItem::leaf(
                "Statements".to_owned(),
                "/docs/surrealql/statements".to_owned()
            )]
        );
        assert!(sidebar.warnings.is_empty());
    }

    #[test]
    fn test_stale_category_omitted_with_warning() {
        let sidebar = sidebar(vec![
            page("doc-surrealql/intro.mdx", "title: Intro"),
            SourceFile::new(
                "doc-surrealql/removed/_category_.json",
                r#"{"sidebar_label": "Removed"}"#,
            ),
            SourceFile::new("doc-surrealql/a/b/_category_.json", r#"{"sidebar_position": 1}"#),
        ]);
        assert_eq!(labels(&sidebar.items), vec!["Intro"]);
        assert_eq!(sidebar.warnings.len(), 2);
        assert!(sidebar.warnings[0].contains("removed/_category_.json"));
    }

    #[test]
    fn test_category_only_dirs_follow_scan_order() {
        let sidebar = sidebar(vec![
            SourceFile::new("doc-surrealql/b/_category_.json", r#"{"sidebar_label": "B"}"#),
            page("doc-surrealql/a/page.mdx", "title: Page A"),
            page("doc-surrealql/b/page.mdx", "title: Page B"),
            page("doc-surrealql/c.mdx", "title: C"),
        ]);
        // `b` is first met through its page, after `a`.
        assert_eq!(labels(&sidebar.items), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_no_empty_children() {
        fn check(items: &[SidebarItem]) {
            for item in items {
                if let Some(children) = &item.children {
                    assert!(!children.is_empty());
                    check(children);
                }
            }
        }

        let sidebar = sidebar(vec![
            page("doc-surrealql/x/index.mdx", "title: X"),
            page("doc-surrealql/x/y/index.mdx", "title: Y"),
            page("doc-surrealql/x/y/z.mdx", "title: Z"),
        ]);
        check(&sidebar.items);
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let item = SidebarItem {
            label: "Functions".to_owned(),
            href: None,
            children: Some(vec![SidebarItem::leaf(
                "Math".to_owned(),
                "/docs/surrealql/functions/math".to_owned(),
            )]),
        };
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"label":"Functions","children":[{"label":"Math","href":"/docs/surrealql/functions/math"}]}"#
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let sources = vec![
            page("doc-surrealql/b.mdx", "title: B"),
            page("doc-surrealql/a/x.mdx", "title: X"),
            page("doc-surrealql/c.mdx", "title: C"),
        ];
        assert_eq!(sidebar(sources.clone()), sidebar(sources));
    }
}
