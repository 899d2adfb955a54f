//! Content source abstraction for the docs site.
//!
//! The loader never touches the filesystem directly. It consumes a
//! [`ScanResult`]: a flat, ordered list of `(path, contents)` pairs for
//! content and category files, plus hashed image assets. This keeps the
//! loader a plain function of its input and lets tests use in-memory
//! fixtures.
//!
//! # Architecture
//!
//! - [`Storage`] trait with `scan()`, `read()` and `watch()`
//! - [`FsStorage`] walks a content directory in sorted order
//! - [`MockStorage`] for tests (behind the `mock` feature)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use ds_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("content"));
//! let scan = storage.scan()?;
//! for source in &scan.sources {
//!     println!("{}", source.path.display());
//! }
//! ```

mod debouncer;
mod event;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod scanner;
mod storage;

pub use event::{Change, ChangeBatch, ChangeKind, ChangeReceiver, WatchHandle};
pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use scanner::{CATEGORY_FILENAME, FileKind, classify};
pub use storage::{
    AssetFile, ScanResult, SourceFile, Storage, StorageError, StorageErrorKind,
    content_hash,
};
