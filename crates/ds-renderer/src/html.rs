//! HTML fragments and link rewriting.

use std::fmt::Write;

use crate::state::escape_html;

pub(crate) fn code_block(lang: Option<&str>, source: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(source)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(source)).unwrap();
    }
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    write!(out, r#"<img src="{}" alt="{}""#, escape_html(src), escape_html(alt)).unwrap();
    if !title.is_empty() {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    out.push_str(r#" loading="lazy">"#);
}

pub(crate) fn link_start(href: &str, title: &str, out: &mut String) {
    write!(out, r#"<a href="{}""#, escape_html(href)).unwrap();
    if !title.is_empty() {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    out.push('>');
}

/// Resolve a relative link to another markdown source into a page URL.
///
/// `root` is the URL of the collection and `dir` the collection-relative
/// directory holding the current source file, e.g. `/docs/surrealql` and
/// `statements` for `statements/select.mdx`:
///
/// - `./delete.mdx` → `/docs/surrealql/statements/delete`
/// - `../functions/index.md#math` → `/docs/surrealql/functions#math`
///
/// Absolute, external, fragment-only and non-markdown links are returned
/// unchanged, as are links that climb above the collection root.
#[must_use]
pub fn resolve_link(url: &str, root: &str, dir: &str) -> String {
    if url.starts_with('/')
        || url.starts_with('#')
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.contains("://")
    {
        return url.to_owned();
    }

    let (path, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };
    let Some(stem) = path
        .strip_suffix(".mdx")
        .or_else(|| path.strip_suffix(".md"))
    else {
        return url.to_owned();
    };
    let Some(resolved) = resolve_relative_path(stem, dir) else {
        return url.to_owned();
    };

    let clean = resolved
        .strip_suffix("/index")
        .or_else(|| (resolved == "index").then_some(""))
        .unwrap_or(&resolved);
    let root = root.trim_end_matches('/');
    match (root, clean) {
        ("", "") => format!("/{fragment}"),
        (root, "") => format!("{root}{fragment}"),
        (root, clean) => format!("{root}/{clean}{fragment}"),
    }
}

/// Join `relative` onto the directory `base`, applying `.` and `..`.
///
/// Returns `None` when `..` climbs above `base`'s root.
pub(crate) fn resolve_relative_path(relative: &str, base: &str) -> Option<String> {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(component),
        }
    }
    Some(segments.join("/"))
}
