//! Rendered page model.

use ds_content::Collection;
use ds_renderer::TocEntry;
use serde::Serialize;

use crate::navigation::{BreadcrumbItem, NavLink};
use crate::sidebar::SidebarItem;

/// Everything needed to display one page.
#[derive(Clone, Debug, Serialize)]
pub struct PageRenderResult {
    pub collection: Collection,
    pub slug: String,
    pub href: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html: String,
    /// H2 and H3 headings.
    pub toc: Vec<TocEntry>,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    pub sidebar: Vec<SidebarItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    pub no_page_headings: bool,
    /// The body carries its own H1.
    pub body_title: bool,
    pub no_sidebar: bool,
    /// Render problems such as unresolved image references.
    pub warnings: Vec<String>,
}

/// Error returned when a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Page not found: {collection}/{slug}")]
    PageNotFound { collection: Collection, slug: String },
}
