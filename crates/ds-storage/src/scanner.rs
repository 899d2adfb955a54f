//! File discovery by walking the content directory.
//!
//! The scanner only locates files; [`FsStorage`](crate::FsStorage) reads
//! and hashes them. Directory entries are visited in byte-wise name order so
//! that the resulting list (and every tie broken by it downstream) is the
//! same on every platform and every run.

use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory category metadata file.
pub const CATEGORY_FILENAME: &str = "_category_.json";

const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];
const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico"];

/// What a file is to the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Markdown or MDX page.
    Content,
    /// `_category_.json` sidecar.
    Category,
    /// Image referenced from pages.
    Asset,
}

/// Classify a file by name. Returns `None` for files the site ignores.
///
/// Files and directories starting with `.` are ignored, as are `_`-prefixed
/// pages (partials), with the exception of the category file.
#[must_use]
pub fn classify(path: &Path) -> Option<FileKind> {
    let ignored_component = path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('.') && name != "." && name != ".."
    });
    if ignored_component {
        return None;
    }

    let name = path.file_name()?.to_string_lossy();
    if name == CATEGORY_FILENAME {
        return Some(FileKind::Category);
    }
    if name.starts_with('_') {
        return None;
    }

    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    if CONTENT_EXTENSIONS.contains(&ext.as_str()) {
        Some(FileKind::Content)
    } else if ASSET_EXTENSIONS.contains(&ext.as_str()) {
        Some(FileKind::Asset)
    } else {
        None
    }
}

/// A discovered file, not yet read.
#[derive(Debug, Clone)]
pub(crate) struct ScannedFile {
    /// Path relative to the content root.
    pub rel_path: PathBuf,
    /// Absolute (or root-joined) path on disk.
    pub full_path: PathBuf,
    pub kind: FileKind,
}

pub(crate) struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walk the content root. Returns an empty list if it doesn't exist.
    pub(crate) fn scan(&self) -> std::io::Result<Vec<ScannedFile>> {
        let mut files = Vec::new();
        if self.root.is_dir() {
            self.scan_directory(&self.root, Path::new(""), &mut files)?;
        }
        Ok(files)
    }

    fn scan_directory(
        &self,
        dir: &Path,
        rel_dir: &Path,
        files: &mut Vec<ScannedFile>,
    ) -> std::io::Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| {
                let entry = entry?;
                let is_dir = entry.file_type()?.is_dir();
                Ok((entry, is_dir))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|(entry, _)| entry.file_name());

        for (entry, is_dir) in entries {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            let rel_path = rel_dir.join(&name);

            if is_dir {
                if name_str.starts_with('.')
                    || name_str.starts_with('_')
                    || name_str == "node_modules"
                {
                    continue;
                }
                self.scan_directory(&entry.path(), &rel_path, files)?;
            } else if let Some(kind) = classify(&rel_path) {
                files.push(ScannedFile {
                    rel_path,
                    full_path: entry.path(),
                    kind,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(Path::new("doc-cloud/index.mdx")),
            Some(FileKind::Content)
        );
        assert_eq!(
            classify(Path::new("doc-cloud/guide.md")),
            Some(FileKind::Content)
        );
        assert_eq!(
            classify(Path::new("doc-cloud/billing/_category_.json")),
            Some(FileKind::Category)
        );
        assert_eq!(
            classify(Path::new("doc-cloud/img/Logo.PNG")),
            Some(FileKind::Asset)
        );
        assert_eq!(classify(Path::new("doc-cloud/_partial.mdx")), None);
        assert_eq!(classify(Path::new("doc-cloud/.draft.mdx")), None);
        assert_eq!(classify(Path::new(".git/config.md")), None);
        assert_eq!(classify(Path::new("doc-cloud/data.json")), None);
        assert_eq!(classify(Path::new("doc-cloud/README")), None);
    }

    #[test]
    fn test_scan_missing_root() {
        let scanner = Scanner::new(PathBuf::from("/nonexistent/content"));

        assert!(scanner.scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_sorted_depth_first() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        write(root, "doc-b/z.mdx", "");
        write(root, "doc-b/a/index.mdx", "");
        write(root, "doc-a/index.mdx", "");
        write(root, "doc-b/m.md", "");

        let files = Scanner::new(root.to_path_buf()).scan().unwrap();
        let paths: Vec<_> = files
            .iter()
            .map(|f| f.rel_path.to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(
            paths,
            vec![
                "doc-a/index.mdx",
                "doc-b/a/index.mdx",
                "doc-b/m.md",
                "doc-b/z.mdx",
            ]
        );
    }

    #[test]
    fn test_scan_skips_hidden_and_underscore_dirs() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        write(root, ".cache/page.mdx", "");
        write(root, "doc-a/_drafts/page.mdx", "");
        write(root, "doc-a/node_modules/pkg/readme.md", "");
        write(root, "doc-a/page.mdx", "");
        write(root, "doc-a/_category_.json", "{}");

        let files = Scanner::new(root.to_path_buf()).scan().unwrap();
        let kinds: Vec<_> = files.iter().map(|f| f.kind).collect();

        assert_eq!(kinds, vec![FileKind::Category, FileKind::Content]);
    }
}
