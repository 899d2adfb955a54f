//! Site snapshot loading and page rendering.
//!
//! [`Site`] owns the current [`SiteSnapshot`]: the content index, one
//! sidebar per collection and the asset manifest, all built together from
//! one storage scan. A rebuild produces a complete new snapshot and swaps it
//! in only when every step succeeded, so readers never see a partial build.
//!
//! # Thread Safety
//!
//! - [`Site::snapshot`] is an `Arc` clone under a read lock; rendering runs
//!   without holding any lock.
//! - Rebuilds are serialized by a mutex.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use ds_content::{Collection, ContentIndex, Entry, LoadError};
use ds_renderer::{AssetManifest, MarkdownRenderer, strip_esm};
use ds_storage::{Storage, StorageError};
use rayon::prelude::*;
use serde::Serialize;

use crate::navigation::{breadcrumbs, prev_next};
use crate::page::{PageRenderResult, RenderError};
use crate::redirects::Redirects;
use crate::routing::{Resolution, Router, encode_slug};
use crate::search::{SearchRecord, page_records};
use crate::sidebar::{Sidebar, SidebarItem, build_sidebar};

/// Deepest heading level shown in the page outline.
const TOC_MAX_LEVEL: u8 = 3;

/// Error returned when the site cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Failed to write sitemap: {0}")]
    Sitemap(String),
}

/// Settings for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// URL path all pages live under, e.g. `/docs`.
    pub base_path: String,
    /// Scheme and host used for absolute URLs, e.g. `https://surrealdb.com`.
    pub site_url: String,
    /// Repository browser URL of the content root, for "edit this page" links.
    pub edit_url_base: Option<String>,
    /// Target collection for paths under an unknown prefix.
    pub default_collection: Collection,
    /// Legacy path to target URL.
    pub redirects: HashMap<String, String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_path: "/docs".to_owned(),
            site_url: "http://localhost:8080".to_owned(),
            edit_url_base: None,
            default_collection: Collection::Surrealdb,
            redirects: HashMap::new(),
        }
    }
}

/// One consistent build of the site.
#[derive(Debug)]
pub struct SiteSnapshot {
    index: ContentIndex,
    sidebars: HashMap<Collection, Sidebar>,
    manifest: AssetManifest,
}

impl SiteSnapshot {
    fn build(storage: &dyn Storage, router: &Router) -> Result<Self, SiteError> {
        let scan = storage.scan()?;
        let index = ContentIndex::load(&scan.sources)?;

        let sidebars = index
            .collections()
            .map(|c| (c, build_sidebar(&index, c, router.base_path())))
            .collect();

        let mut manifest = AssetManifest::new(format!("{}/_assets", router.base_path()));
        for asset in &scan.assets {
            manifest.insert(&asset.path, &asset.hash);
        }

        Ok(Self {
            index,
            sidebars,
            manifest,
        })
    }

    #[must_use]
    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    #[must_use]
    pub fn sidebar(&self, collection: Collection) -> Option<&Sidebar> {
        self.sidebars.get(&collection)
    }

    #[must_use]
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Sidebar warnings of every collection.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.index
            .collections()
            .filter_map(|c| self.sidebars.get(&c))
            .flat_map(|s| s.warnings.iter().map(String::as_str))
    }
}

/// Collection overview for the site landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub collection: Collection,
    pub label: &'static str,
    pub href: String,
    pub pages: usize,
}

/// Asset file contents.
#[derive(Clone, Debug)]
pub struct Asset {
    /// Source path relative to the content root.
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// The documentation site.
pub struct Site {
    storage: Arc<dyn Storage>,
    router: Router,
    redirects: Redirects,
    site_url: String,
    edit_url_base: Option<String>,
    reload_lock: Mutex<()>,
    current: RwLock<Arc<SiteSnapshot>>,
}

impl Site {
    /// Build the site from `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if storage cannot be scanned or any content file
    /// is invalid.
    pub fn load(storage: Arc<dyn Storage>, settings: SiteSettings) -> Result<Self, SiteError> {
        let router = Router::new(&settings.base_path);
        let redirects = Redirects::new(
            router.base_path(),
            settings.default_collection,
            settings.redirects,
        );

        let start = Instant::now();
        let snapshot = SiteSnapshot::build(storage.as_ref(), &router)?;
        tracing::info!(
            entries = snapshot.index.len(),
            collections = snapshot.sidebars.len(),
            assets = snapshot.manifest.len(),
            redirects = redirects.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Site loaded"
        );

        Ok(Self {
            storage,
            router,
            redirects,
            site_url: settings.site_url.trim_end_matches('/').to_owned(),
            edit_url_base: settings.edit_url_base,
            reload_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Rebuild from storage, replacing the snapshot only on success.
    ///
    /// # Errors
    ///
    /// Returns the build error; the previous snapshot stays in place.
    pub fn rebuild(&self) -> Result<(), SiteError> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let start = Instant::now();
        match SiteSnapshot::build(self.storage.as_ref(), &self.router) {
            Ok(snapshot) => {
                tracing::info!(
                    entries = snapshot.index.len(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Site rebuilt"
                );
                *self
                    .current
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Site rebuild failed, keeping previous build");
                Err(e)
            }
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SiteSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Resolve a request path to a page or redirect.
    ///
    /// Legacy redirects apply only to paths that match no page.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Resolution {
        let snapshot = self.snapshot();
        match self.router.resolve(path, &snapshot.index, &snapshot.sidebars) {
            Resolution::NotFound => self
                .redirects
                .lookup(path)
                .map_or(Resolution::NotFound, Resolution::Redirect),
            resolution => resolution,
        }
    }

    /// Render one page with its navigation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::PageNotFound`] if no entry has this slug.
    pub fn render(&self, collection: Collection, slug: &str) -> Result<PageRenderResult, RenderError> {
        let snapshot = self.snapshot();
        let entry = snapshot
            .index
            .get(collection, slug)
            .ok_or_else(|| RenderError::PageNotFound {
                collection,
                slug: slug.to_owned(),
            })?;

        let href = self.router.href(collection, slug);
        let body = page_body(entry);
        let result = self
            .renderer(&snapshot, entry)
            .with_title_extraction()
            .render_markdown(&body);
        for warning in &result.warnings {
            tracing::warn!(page = %href, "{warning}");
        }
        let body_title = result.title.is_some();

        let items = snapshot
            .sidebars
            .get(&collection)
            .map(|s| s.items.clone())
            .unwrap_or_default();
        let (prev, next) = prev_next(&items, &href);

        Ok(PageRenderResult {
            collection,
            slug: slug.to_owned(),
            title: entry
                .data
                .title
                .clone()
                .or(result.title)
                .unwrap_or_else(|| entry.title()),
            description: entry.data.description.clone(),
            html: result.html,
            toc: result
                .toc
                .into_iter()
                .filter(|t| t.level <= TOC_MAX_LEVEL)
                .collect(),
            breadcrumbs: breadcrumbs(&items, &href),
            prev,
            next,
            sidebar: items,
            edit_url: self.edit_url_base.as_deref().map(|b| entry.edit_url(b)),
            no_page_headings: entry.data.no_page_headings.unwrap_or(false),
            body_title,
            no_sidebar: entry.data.no_sidebar.unwrap_or(false),
            warnings: result.warnings,
            href,
        })
    }

    /// Sidebar items of a collection.
    #[must_use]
    pub fn sidebar(&self, collection: Collection) -> Option<Vec<SidebarItem>> {
        self.snapshot()
            .sidebars
            .get(&collection)
            .map(|s| s.items.clone())
    }

    /// Non-empty collections in navigation order.
    #[must_use]
    pub fn collections(&self) -> Vec<CollectionSummary> {
        let snapshot = self.snapshot();
        snapshot
            .index
            .collections()
            .map(|collection| CollectionSummary {
                collection,
                label: collection.label(),
                href: self.router.href(collection, ""),
                pages: snapshot.index.entries(collection).len(),
            })
            .collect()
    }

    /// Absolute URL of every page, by collection then scan order.
    #[must_use]
    pub fn canonical_urls(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        snapshot
            .index
            .collections()
            .flat_map(|c| snapshot.index.entries(c))
            .map(|e| format!("{}{}", self.site_url, self.router.href(e.collection, &e.slug)))
            .collect()
    }

    /// Sitemap document for [`canonical_urls`](Self::canonical_urls).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Sitemap`] if XML writing fails.
    pub fn sitemap_xml(&self) -> Result<String, SiteError> {
        let urls = self.canonical_urls();
        crate::sitemap::sitemap_xml(urls.iter().map(String::as_str))
    }

    /// Render every page and extract its search records.
    #[must_use]
    pub fn search_records(&self) -> Vec<SearchRecord> {
        let start = Instant::now();
        let snapshot = self.snapshot();
        let entries: Vec<&Entry> = snapshot
            .index
            .collections()
            .flat_map(|c| snapshot.index.entries(c))
            .collect();

        let records: Vec<SearchRecord> = entries
            .par_iter()
            .flat_map_iter(|entry| {
                let body = page_body(entry);
                let result = self
                    .renderer(&snapshot, entry)
                    .with_title_extraction()
                    .with_text_extraction()
                    .render_markdown(&body);
                let title = entry
                    .data
                    .title
                    .clone()
                    .or(result.title)
                    .unwrap_or_else(|| entry.title());
                let url = format!(
                    "{}{}",
                    self.site_url,
                    self.router.href(entry.collection, &entry.slug)
                );
                page_records(&url, &title, entry.collection, result.blocks)
            })
            .collect();

        tracing::info!(
            pages = entries.len(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Search records extracted"
        );
        records
    }

    /// Read an asset by its served file name (e.g. `logo.1a2b3c4d.png`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the asset is known but cannot be read.
    pub fn asset(&self, served_name: &str) -> Result<Option<Asset>, StorageError> {
        let snapshot = self.snapshot();
        let Some(path) = snapshot.manifest.source(served_name) else {
            return Ok(None);
        };
        let bytes = self.storage.read(path)?;
        Ok(Some(Asset {
            path: path.to_path_buf(),
            bytes,
        }))
    }

    fn renderer<'a>(&self, snapshot: &'a SiteSnapshot, entry: &Entry) -> MarkdownRenderer<'a> {
        // Relative links resolve inside the collection, from the source directory.
        let dir: Vec<&str> = entry
            .source_dir()
            .components()
            .skip(1)
            .filter_map(|c| c.as_os_str().to_str())
            .collect();
        MarkdownRenderer::new()
            .with_link_base(
                self.router.href(entry.collection, ""),
                encode_slug(&dir.join("/")),
            )
            .with_assets(&snapshot.manifest, entry.source_dir())
    }
}

fn page_body(entry: &Entry) -> Cow<'_, str> {
    let is_mdx = entry
        .file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mdx"));
    if is_mdx {
        strip_esm(&entry.body)
    } else {
        Cow::Borrowed(&entry.body)
    }
}
