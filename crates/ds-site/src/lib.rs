//! Site structure, navigation and page rendering for the documentation site.
//!
//! This crate provides:
//! - [`build_sidebar`]: the navigation tree of one collection
//! - [`breadcrumbs`] and [`prev_next`]: pure functions over that tree
//! - [`Router`] and [`Redirects`]: request path resolution
//! - [`Site`]: the current build, with page rendering, sitemap and
//!   search records
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use ds_content::Collection;
//! use ds_site::{Site, SiteSettings};
//! use ds_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("content")));
//! let site = Site::load(storage, SiteSettings::default())?;
//!
//! let page = site.render(Collection::Surrealql, "statements/select")?;
//! println!("{}", page.title);
//! # Ok(())
//! # }
//! ```

mod navigation;
mod page;
mod redirects;
mod routing;
mod search;
mod sidebar;
mod site;
mod sitemap;

pub use navigation::{BreadcrumbItem, NavLink, breadcrumbs, flatten, prev_next};
pub use page::{PageRenderResult, RenderError};
pub use redirects::Redirects;
pub use routing::{Resolution, Router, encode_slug, page_href};
pub use search::{SearchRecord, page_records};
pub use sidebar::{Sidebar, SidebarItem, build_sidebar};
pub use site::{Asset, CollectionSummary, Site, SiteError, SiteSettings, SiteSnapshot};
pub use sitemap::sitemap_xml;

pub use ds_renderer::TocEntry;
