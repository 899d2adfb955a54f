//! Breadcrumbs and previous/next links derived from a sidebar tree.

use serde::Serialize;

use crate::sidebar::SidebarItem;

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub label: String,
    /// `None` for a group without an index page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Link to a neighbouring page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// All nodes in pre-order: each node, then its children.
#[must_use]
pub fn flatten(items: &[SidebarItem]) -> Vec<&SidebarItem> {
    fn walk<'a>(items: &'a [SidebarItem], out: &mut Vec<&'a SidebarItem>) {
        for item in items {
            out.push(item);
            if let Some(children) = &item.children {
                walk(children, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(items, &mut out);
    out
}

/// Root-to-page chain for the page at `href`, ending with the page itself.
///
/// Empty if no node links to `href`.
#[must_use]
pub fn breadcrumbs(items: &[SidebarItem], href: &str) -> Vec<BreadcrumbItem> {
    fn find<'a>(items: &'a [SidebarItem], target: &str, path: &mut Vec<&'a SidebarItem>) -> bool {
        for item in items {
            path.push(item);
            if item.href.as_deref().is_some_and(|h| same_href(h, target)) {
                return true;
            }
            if let Some(children) = &item.children
                && find(children, target, path)
            {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    find(items, href, &mut path);
    path.into_iter()
        .map(|item| BreadcrumbItem {
            label: item.label.clone(),
            href: item.href.clone(),
        })
        .collect()
}

/// Pages immediately before and after `href` in pre-order, skipping
/// groups without an index page.
#[must_use]
pub fn prev_next(items: &[SidebarItem], href: &str) -> (Option<NavLink>, Option<NavLink>) {
    let pages: Vec<NavLink> = flatten(items)
        .into_iter()
        .filter_map(|item| {
            item.href.as_ref().map(|h| NavLink {
                label: item.label.clone(),
                href: h.clone(),
            })
        })
        .collect();

    let Some(pos) = pages.iter().position(|p| same_href(&p.href, href)) else {
        return (None, None);
    };
    let prev = pos.checked_sub(1).and_then(|i| pages.get(i)).cloned();
    let next = pages.get(pos + 1).cloned();
    (prev, next)
}

fn same_href(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(href: &str) -> &str {
    let trimmed = href.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn leaf(label: &str, href: &str) -> SidebarItem {
        SidebarItem {
            label: label.to_owned(),
            href: Some(href.to_owned()),
            children: None,
        }
    }

    fn group(label: &str, href: Option<&str>, children: Vec<SidebarItem>) -> SidebarItem {
        SidebarItem {
            label: label.to_owned(),
            href: href.map(ToOwned::to_owned),
            children: Some(children),
        }
    }

    /// Overview
    /// Statements (/s)
    ///   SELECT
    ///   Clauses (no page)
    ///     WHERE
    /// Functions (no page)
    ///   Math
    fn tree() -> Vec<SidebarItem> {
        vec![
            leaf("Overview", "/docs/surrealql"),
            group(
                "Statements",
                Some("/docs/surrealql/statements"),
                vec![
                    leaf("SELECT", "/docs/surrealql/statements/select"),
                    group(
                        "Clauses",
                        None,
                        vec![leaf("WHERE", "/docs/surrealql/statements/clauses/where")],
                    ),
                ],
            ),
            group(
                "Functions",
                None,
                vec![leaf("Math", "/docs/surrealql/functions/math")],
            ),
        ]
    }

    fn hrefs(links: &[BreadcrumbItem]) -> Vec<Option<&str>> {
        links.iter().map(|l| l.href.as_deref()).collect()
    }

    #[test]
    fn test_flatten_pre_order() {
        let tree = tree();
        let labels: Vec<&str> = flatten(&tree).iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Overview", "Statements", "SELECT", "Clauses", "WHERE", "Functions", "Math"]
        );
    }

    #[test]
    fn test_breadcrumbs_depth_matches() {
        let tree = tree();

        let crumbs = breadcrumbs(&tree, "/docs/surrealql/statements/clauses/where");
        assert_eq!(
            hrefs(&crumbs),
            vec![
                Some("/docs/surrealql/statements"),
                None,
                Some("/docs/surrealql/statements/clauses/where"),
            ]
        );

        assert_eq!(breadcrumbs(&tree, "/docs/surrealql").len(), 1);
        assert_eq!(breadcrumbs(&tree, "/docs/surrealql/statements").len(), 1);
    }

    #[test]
    fn test_breadcrumbs_trailing_slash() {
        let tree = tree();
        let crumbs = breadcrumbs(&tree, "/docs/surrealql/functions/math/");
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].label, "Functions");
        assert_eq!(
            crumbs[1].href.as_deref(),
            Some("/docs/surrealql/functions/math")
        );
    }

    #[test]
    fn test_breadcrumbs_unknown_page() {
        assert!(breadcrumbs(&tree(), "/docs/nope").is_empty());
    }

    #[test]
    fn test_prev_next_middle() {
        let (prev, next) = prev_next(&tree(), "/docs/surrealql/statements/select");
        assert_eq!(prev.unwrap().label, "Statements");
        // `Clauses` has no page and is skipped.
        assert_eq!(next.unwrap().label, "WHERE");
    }

    #[test]
    fn test_prev_next_ends() {
        let tree = tree();
        let (prev, next) = prev_next(&tree, "/docs/surrealql");
        assert_eq!(prev, None);
        assert_eq!(next.unwrap().href, "/docs/surrealql/statements");

        let (prev, next) = prev_next(&tree, "/docs/surrealql/functions/math");
        assert_eq!(prev.unwrap().label, "WHERE");
        assert_eq!(next, None);
    }

    #[test]
    fn test_prev_next_unknown_page() {
        assert_eq!(prev_next(&tree(), "/docs/nope"), (None, None));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/docs/"), "/docs");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
    }
}
