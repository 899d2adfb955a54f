//! Built-in HTML template.
//!
//! Pages are complete documents: sidebar, breadcrumbs, article, previous and
//! next links, and an outline of the H2/H3 headings.

use ds_renderer::{TocEntry, escape_html};
use ds_site::{BreadcrumbItem, CollectionSummary, NavLink, PageRenderResult, SidebarItem};

const STYLE: &str = "\
body{margin:0;font:16px/1.6 system-ui,sans-serif;color:#1f2328}\
a{color:#ff00a0;text-decoration:none}\
.layout{display:flex;gap:2rem;max-width:90rem;margin:0 auto;padding:1.5rem}\
.sidebar{flex:0 0 16rem;font-size:.9rem}\
.sidebar ul{list-style:none;padding-left:1rem;margin:0}\
.sidebar a.active{font-weight:600}\
main{flex:1;min-width:0}\
.breadcrumbs ol{list-style:none;display:flex;gap:.5rem;padding:0;font-size:.85rem}\
.breadcrumbs li+li::before{content:'/';margin-right:.5rem;color:#8c959f}\
.pager{display:flex;justify-content:space-between;margin-top:3rem}\
.toc{flex:0 0 14rem;font-size:.85rem}\
.toc .level-3{padding-left:1rem}\
pre{overflow-x:auto;background:#f6f8fa;padding:1rem}";

/// Parts of the page frame that depend on the server, not the page.
pub(crate) struct Chrome<'a> {
    pub(crate) base_path: &'a str,
    pub(crate) live_reload: bool,
}

/// Full document for a rendered page.
pub(crate) fn page(page: &PageRenderResult, chrome: &Chrome<'_>) -> String {
    let mut out = String::with_capacity(page.html.len() + 4096);
    head(&page.title, page.description.as_deref(), chrome, &mut out);

    out.push_str(r#"<div class="layout">"#);
    if !page.no_sidebar {
        out.push_str(r#"<nav class="sidebar">"#);
        sidebar(&page.sidebar, &page.href, &mut out);
        out.push_str("</nav>");
    }

    out.push_str("<main>");
    breadcrumbs(&page.breadcrumbs, &mut out);
    out.push_str("<article>");
    if !page.no_page_headings && !page.body_title {
        out.push_str(&format!("<h1>{}</h1>", escape_html(&page.title)));
    }
    out.push_str(&page.html);
    out.push_str("</article>");
    pager(page.prev.as_ref(), page.next.as_ref(), &mut out);
    if let Some(edit_url) = &page.edit_url {
        out.push_str(&format!(
            r#"<p class="edit"><a href="{}">Edit this page</a></p>"#,
            escape_html(edit_url)
        ));
    }
    out.push_str("</main>");

    if !page.toc.is_empty() {
        toc(&page.toc, &mut out);
    }
    out.push_str("</div></body></html>");
    out
}

/// Landing page listing every collection.
pub(crate) fn listing(collections: &[CollectionSummary], chrome: &Chrome<'_>) -> String {
    let mut out = String::with_capacity(2048);
    head("Documentation", None, chrome, &mut out);
    out.push_str(r#"<div class="layout"><main><h1>Documentation</h1><ul class="collections">"#);
    for summary in collections {
        out.push_str(&format!(
            r#"<li><a href="{}">{}</a> <small>{} pages</small></li>"#,
            escape_html(&summary.href),
            escape_html(summary.label),
            summary.pages
        ));
    }
    out.push_str("</ul></main></div></body></html>");
    out
}

pub(crate) fn not_found(path: &str, chrome: &Chrome<'_>) -> String {
    let mut out = String::with_capacity(1024);
    head("Page not found", None, chrome, &mut out);
    out.push_str(&format!(
        r#"<div class="layout"><main><h1>Page not found</h1><p>Nothing lives at <code>{}</code>.</p><p><a href="{}/">Back to the documentation</a></p></main></div></body></html>"#,
        escape_html(path),
        escape_html(chrome.base_path)
    ));
    out
}

fn head(title: &str, description: Option<&str>, chrome: &Chrome<'_>, out: &mut String) {
    out.push_str(r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8">"#);
    out.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    out.push_str(&format!(
        "<title>{} | SurrealDB Docs</title>",
        escape_html(title)
    ));
    if let Some(description) = description {
        out.push_str(&format!(
            r#"<meta name="description" content="{}">"#,
            escape_html(description)
        ));
    }
    out.push_str("<style>");
    out.push_str(STYLE);
    out.push_str("</style>");
    if chrome.live_reload {
        out.push_str(&format!(
            r#"<script src="{}/_live-reload.js" defer></script>"#,
            escape_html(chrome.base_path)
        ));
    }
    out.push_str("</head><body>");
}

fn sidebar(items: &[SidebarItem], current: &str, out: &mut String) {
    out.push_str("<ul>");
    for item in items {
        out.push_str("<li>");
        let label = escape_html(&item.label);
        match &item.href {
            Some(href) if href == current => out.push_str(&format!(
                r#"<a href="{}" class="active" aria-current="page">{label}</a>"#,
                escape_html(href)
            )),
            Some(href) => out.push_str(&format!(r#"<a href="{}">{label}</a>"#, escape_html(href))),
            None => out.push_str(&format!("<span>{label}</span>")),
        }
        if let Some(children) = &item.children {
            sidebar(children, current, out);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

fn breadcrumbs(items: &[BreadcrumbItem], out: &mut String) {
    if items.is_empty() {
        return;
    }
    out.push_str(r#"<nav class="breadcrumbs" aria-label="Breadcrumb"><ol>"#);
    for item in items {
        let label = escape_html(&item.label);
        match &item.href {
            Some(href) => out.push_str(&format!(
                r#"<li><a href="{}">{label}</a></li>"#,
                escape_html(href)
            )),
            None => out.push_str(&format!("<li>{label}</li>")),
        }
    }
    out.push_str("</ol></nav>");
}

fn pager(prev: Option<&NavLink>, next: Option<&NavLink>, out: &mut String) {
    if prev.is_none() && next.is_none() {
        return;
    }
    out.push_str(r#"<nav class="pager">"#);
    for (link, rel, before, after) in [
        (prev, "prev", "&larr; ", ""),
        (next, "next", "", " &rarr;"),
    ] {
        let Some(link) = link else {
            out.push_str("<span></span>");
            continue;
        };
        out.push_str(&format!(
            r#"<a href="{}" rel="{rel}">{before}{}{after}</a>"#,
            escape_html(&link.href),
            escape_html(&link.label)
        ));
    }
    out.push_str("</nav>");
}

fn toc(entries: &[TocEntry], out: &mut String) {
    out.push_str(r#"<aside class="toc"><p>On this page</p><ul>"#);
    for entry in entries {
        out.push_str(&format!(
            r##"<li class="level-{}"><a href="#{}">{}</a></li>"##,
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title)
        ));
    }
    out.push_str("</ul></aside>");
}
