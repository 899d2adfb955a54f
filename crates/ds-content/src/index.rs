//! The content index: every entry and category, keyed by collection.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use ds_storage::{FileKind, SourceFile, classify};
use rayon::prelude::*;

use crate::category::CategoryMeta;
use crate::collection::Collection;
use crate::entry::{Entry, slug_from_path};
use crate::error::LoadError;
use crate::frontmatter;

/// Category metadata attached to one directory of a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    /// Directory path relative to the collection, `/`-joined (`""` for the root).
    pub dir: String,
    pub meta: CategoryMeta,
    /// Source path relative to the content root.
    pub file_path: PathBuf,
}

#[derive(Debug, Default)]
struct CollectionContent {
    /// Entries in scan order.
    entries: Vec<Entry>,
    by_slug: HashMap<String, usize>,
    /// Categories in scan order.
    categories: Vec<Category>,
}

/// Immutable index of all content, built in one pass.
///
/// Constructed once per build and passed by reference to whatever needs it.
/// A rebuild produces a fresh index.
#[derive(Debug, Default)]
pub struct ContentIndex {
    collections: HashMap<Collection, CollectionContent>,
}

/// One source file after parsing, before it is placed in the index.
enum Parsed {
    Entry(Entry),
    Category(Collection, Category),
}

impl ContentIndex {
    /// Build the index from `(path, contents)` pairs in scan order.
    ///
    /// Files outside a known collection directory are skipped. The first
    /// invalid file in scan order aborts the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] for invalid frontmatter, invalid category
    /// metadata or duplicate slugs.
    pub fn load(sources: &[SourceFile]) -> Result<Self, LoadError> {
        let start = Instant::now();

        let parsed: Vec<Result<Option<Parsed>, LoadError>> =
            sources.par_iter().map(parse_source).collect();

        let mut index = Self::default();
        let mut categories = 0;
        for item in parsed {
            match item? {
                Some(Parsed::Entry(entry)) => index.insert(entry)?,
                Some(Parsed::Category(collection, category)) => {
                    categories += 1;
                    index
                        .collections
                        .entry(collection)
                        .or_default()
                        .categories
                        .push(category);
                }
                None => {}
            }
        }

        tracing::info!(
            entries = index.len(),
            categories,
            collections = index.collections.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content index built"
        );

        Ok(index)
    }

    fn insert(&mut self, entry: Entry) -> Result<(), LoadError> {
        let content = self.collections.entry(entry.collection).or_default();

        if let Some(&existing) = content.by_slug.get(&entry.slug) {
            return Err(LoadError::DuplicateSlug {
                collection: entry.collection,
                slug: entry.slug,
                first: content.entries[existing].file_path.clone(),
                second: entry.file_path,
            });
        }

        content
            .by_slug
            .insert(entry.slug.clone(), content.entries.len());
        content.entries.push(entry);
        Ok(())
    }

    /// Look up an entry by exact slug.
    #[must_use]
    pub fn get(&self, collection: Collection, slug: &str) -> Option<&Entry> {
        let content = self.collections.get(&collection)?;
        content.by_slug.get(slug).map(|&i| &content.entries[i])
    }

    /// Entries of a collection in scan order.
    #[must_use]
    pub fn entries(&self, collection: Collection) -> &[Entry] {
        self.collections
            .get(&collection)
            .map_or(&[], |c| c.entries.as_slice())
    }

    /// Category files of a collection in scan order.
    #[must_use]
    pub fn categories(&self, collection: Collection) -> &[Category] {
        self.collections
            .get(&collection)
            .map_or(&[], |c| c.categories.as_slice())
    }

    /// Category metadata for one directory.
    #[must_use]
    pub fn category(&self, collection: Collection, dir: &str) -> Option<&CategoryMeta> {
        self.categories(collection)
            .iter()
            .find(|c| c.dir == dir)
            .map(|c| &c.meta)
    }

    /// Collections that have at least one entry, in [`Collection::ALL`] order.
    pub fn collections(&self) -> impl Iterator<Item = Collection> + '_ {
        Collection::ALL
            .into_iter()
            .filter(|c| !self.entries(*c).is_empty())
    }

    /// All entries, collection by collection.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        Collection::ALL
            .into_iter()
            .flat_map(|c| self.entries(c).iter())
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.values().map(|c| c.entries.len()).sum()
    }

    /// True if no entries were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a content-root-relative path into its collection and the rest.
fn split_collection(path: &Path) -> Option<(Collection, PathBuf)> {
    let mut components = path.components();
    let Some(Component::Normal(first)) = components.next() else {
        return None;
    };
    let collection = Collection::from_dir_name(first.to_str()?)?;
    let rest = components.as_path();
    (!rest.as_os_str().is_empty()).then(|| (collection, rest.to_path_buf()))
}

fn join_segments(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_source(source: &SourceFile) -> Result<Option<Parsed>, LoadError> {
    let Some(kind) = classify(&source.path) else {
        return Ok(None);
    };
    let Some((collection, rel_path)) = split_collection(&source.path) else {
        tracing::debug!(
            path = %source.path.display(),
            "Skipping file outside known collections"
        );
        return Ok(None);
    };

    match kind {
        FileKind::Content => parse_entry(source, collection, &rel_path).map(Some),
        FileKind::Category => {
            let meta = CategoryMeta::parse(&source.contents).map_err(|e| LoadError::Category {
                path: source.path.clone(),
                source: e,
            })?;
            let dir = join_segments(rel_path.parent().unwrap_or(Path::new("")));
            Ok(Some(Parsed::Category(
                collection,
                Category {
                    dir,
                    meta,
                    file_path: source.path.clone(),
                },
            )))
        }
        FileKind::Asset => Ok(None),
    }
}

fn parse_entry(
    source: &SourceFile,
    collection: Collection,
    rel_path: &Path,
) -> Result<Parsed, LoadError> {
    let (yaml, body) =
        frontmatter::split(&source.contents).map_err(|_| LoadError::UnterminatedFrontmatter {
            path: source.path.clone(),
        })?;

    let data = collection
        .parse_frontmatter(yaml.unwrap_or_default())
        .map_err(|e| LoadError::Frontmatter {
            path: source.path.clone(),
            source: e,
        })?;

    // classify() only accepts named files, so there is always a final segment.
    let slug = slug_from_path(rel_path).unwrap_or_default();

    Ok(Parsed::Entry(Entry {
        collection,
        slug,
        file_path: source.path.clone(),
        data,
        body: body.to_owned(),
    }))
}
