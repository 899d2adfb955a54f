//! Content collections for the docs site.
//!
//! Turns the `(path, contents)` pairs produced by a
//! [`Storage`](ds_storage::Storage) scan into a [`ContentIndex`]:
//!
//! - markdown/MDX files become [`Entry`] values keyed by `(collection, slug)`,
//!   with frontmatter validated against the collection's schema
//! - `_category_.json` files become [`CategoryMeta`] keyed by
//!   `(collection, directory)`
//!
//! Loading is all-or-nothing: any invalid file fails the build with a
//! [`LoadError`] naming that file.

mod category;
mod collection;
mod entry;
mod error;
mod frontmatter;
mod index;

pub use category::CategoryMeta;
pub use collection::Collection;
pub use entry::{Entry, slug_from_path, titlecase_from_slug};
pub use error::LoadError;
pub use frontmatter::Frontmatter;
pub use index::{Category, ContentIndex};
