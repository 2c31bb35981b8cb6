//! Filesystem access beneath the served root.
//!
//! Every request path is interpreted relative to the root, cleaned of
//! `..` tricks, canonicalized and then checked to still lie inside the
//! root, so symlinks cannot escape it either.

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;
use std::{
    io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};

use crate::classify::{display_extension, is_hidden, is_text_file};

/// Files above this size are listed but never read.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Access denied")]
    AccessDenied,
    #[error("Path not found")]
    NotFound,
    #[error("Not a directory")]
    NotADirectory,
    #[error("Is a directory")]
    IsADirectory,
    #[error("Cannot read path: {0}")]
    Io(#[from] io::Error),
}

impl FileError {
    pub fn status(&self) -> StatusCode {
        match self {
            FileError::AccessDenied => StatusCode::FORBIDDEN,
            FileError::NotFound => StatusCode::NOT_FOUND,
            FileError::NotADirectory | FileError::IsADirectory => StatusCode::BAD_REQUEST,
            FileError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

#[derive(Serialize, Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    /// Path relative to the root, `/`-separated.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub modified: Option<DateTime<Utc>>,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl DirEntryInfo {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Listing {
    /// Relative path of the listed directory; empty for the root.
    pub path: String,
    /// `None` when the listed directory is the root itself.
    pub parent: Option<String>,
    pub items: Vec<DirEntryInfo>,
}

/// A file's metadata and, when previewable, its text.
#[derive(Serialize, Debug, Clone)]
pub struct FilePreview {
    pub path: String,
    pub name: String,
    pub ext: String,
    pub size: u64,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The directory everything is served from.
#[derive(Debug, Clone)]
pub struct FileRoot {
    root: PathBuf,
}

impl FileRoot {
    /// Canonicalizes `dir` and checks that it is a directory.
    pub async fn open(dir: &Path) -> io::Result<Self> {
        let root = fs::canonicalize(dir).await?;
        if !fs::metadata(&root).await?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolves a client path to an absolute path inside the root.
    pub async fn resolve(&self, requested: &str) -> Result<PathBuf, FileError> {
        let relative = sanitize_path(requested);
        let candidate = self.root.join(&relative);

        match fs::canonicalize(&candidate).await {
            Ok(canonical) if canonical.starts_with(&self.root) => Ok(canonical),
            Ok(canonical) => {
                error!(
                    "Path traversal attempt: '{}' resolved to '{}' which is outside root '{}'",
                    requested,
                    canonical.display(),
                    self.root.display()
                );
                Err(FileError::AccessDenied)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Path not found: {}", candidate.display());
                Err(FileError::NotFound)
            }
            Err(e) => {
                error!("Failed to canonicalize '{}': {}", candidate.display(), e);
                Err(FileError::Io(e))
            }
        }
    }

    /// `abs` relative to the root, `/`-separated.
    pub fn relative(&self, abs: &Path) -> String {
        abs.strip_prefix(&self.root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default()
    }

    /// Lists a directory: directories first, then files, each sorted by
    /// name case-insensitively. Unreadable entries are skipped.
    pub async fn list_dir(&self, requested: &str) -> Result<Listing, FileError> {
        let dir = self.resolve(requested).await?;
        if !fs::metadata(&dir).await?.is_dir() {
            return Err(FileError::NotADirectory);
        }

        let mut entries = fs::read_dir(&dir).await?;
        let mut items = Vec::new();

        while let Ok(Some(entry)) = entries.next_entry().await {
            let entry_path = entry.path();
            let Ok(name) = entry.file_name().into_string() else {
                debug!("Skipping entry with non-UTF8 filename in {}", dir.display());
                continue;
            };
            // Follows symlinks, so a link to a directory lists as one
            let metadata = match fs::metadata(&entry_path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Failed to get metadata for {}: {}", entry_path.display(), e);
                    continue;
                }
            };
            let is_dir = metadata.is_dir();
            items.push(DirEntryInfo {
                path: self.relative(&entry_path),
                kind: if is_dir { EntryKind::Dir } else { EntryKind::File },
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                hidden: is_hidden(&name),
                size: (!is_dir).then(|| metadata.len()),
                name,
            });
        }

        items.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        let parent = if dir == self.root {
            None
        } else {
            dir.parent().map(|p| self.relative(p))
        };

        Ok(Listing {
            path: self.relative(&dir),
            parent,
            items,
        })
    }

    /// Reads a file for preview. Oversized and non-text files come back
    /// without content and with an explanation instead.
    pub async fn read_file(&self, requested: &str) -> Result<FilePreview, FileError> {
        let path = self.resolve(requested).await?;
        let metadata = fs::metadata(&path).await?;
        if metadata.is_dir() {
            return Err(FileError::IsADirectory);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut preview = FilePreview {
            path: self.relative(&path),
            ext: display_extension(&name),
            size: metadata.len(),
            content: None,
            error: None,
            name,
        };

        if preview.size > MAX_FILE_SIZE {
            preview.error = Some(format!(
                "File too large (max 1MB). Size: {:.1}MB",
                preview.size as f64 / 1024.0 / 1024.0
            ));
            return Ok(preview);
        }
        if !is_text_file(&preview.name) {
            preview.error = Some("Binary file \u{2014} preview not available".to_string());
            return Ok(preview);
        }

        let bytes = fs::read(&path).await?;
        preview.content = Some(String::from_utf8_lossy(&bytes).into_owned());
        Ok(preview)
    }
}

/// Cleans a client path into a relative path: root and prefix components
/// are dropped, `.` is ignored and `..` pops, so the result never climbs.
/// An empty result means the root.
fn sanitize_path(path_str: &str) -> PathBuf {
    let mut clean_path = PathBuf::new();
    for component in Path::new(path_str).components() {
        match component {
            Component::Normal(comp) => clean_path.push(comp),
            Component::ParentDir => {
                clean_path.pop();
            }
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }
    clean_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn fixture() -> (TempDir, FileRoot) {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("src")).expect("mkdir");
        std::fs::create_dir(dir.path().join(".git")).expect("mkdir");
        std::fs::write(dir.path().join("README.md"), "# Hello\n").expect("write");
        std::fs::write(dir.path().join("b.txt"), "b").expect("write");
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}\n").expect("write");
        std::fs::write(dir.path().join("image.png"), [0x89, b'P', b'N', b'G']).expect("write");
        let root = FileRoot::open(dir.path()).await.expect("root");
        (dir, root)
    }

    #[test]
    fn sanitize_never_climbs() {
        assert_eq!(sanitize_path("../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(sanitize_path("/abs/./x/../y"), PathBuf::from("abs/y"));
        assert_eq!(sanitize_path(""), PathBuf::new());
        assert_eq!(sanitize_path(".env"), PathBuf::from(".env"));
    }

    #[tokio::test]
    async fn lists_directories_first() {
        let (_dir, root) = fixture().await;
        let listing = root.list_dir("").await.expect("listing");
        let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec![".git", "src", "b.txt", "image.png", "README.md"]);
        assert!(listing.parent.is_none());
        assert!(listing.items[0].hidden);
        assert_eq!(listing.items[1].size, None);
        assert_eq!(listing.items[2].size, Some(1));
    }

    #[tokio::test]
    async fn subdirectories_point_back_to_their_parent() {
        let (_dir, root) = fixture().await;
        let listing = root.list_dir("src").await.expect("listing");
        assert_eq!(listing.path, "src");
        assert_eq!(listing.parent.as_deref(), Some(""));
        assert_eq!(listing.items[0].path, "src/main.rs");
    }

    #[tokio::test]
    async fn reads_text_files() {
        let (_dir, root) = fixture().await;
        let preview = root.read_file("README.md").await.expect("preview");
        assert_eq!(preview.ext, "md");
        assert_eq!(preview.content.as_deref(), Some("# Hello\n"));
        assert!(preview.error.is_none());
    }

    #[tokio::test]
    async fn binary_and_oversized_files_have_no_content() {
        let (dir, root) = fixture().await;
        let preview = root.read_file("image.png").await.expect("preview");
        assert!(preview.content.is_none());
        assert!(preview.error.as_deref().is_some_and(|e| e.starts_with("Binary file")));

        std::fs::write(dir.path().join("big.txt"), vec![b'a'; 2 * 1024 * 1024]).expect("write");
        let preview = root.read_file("big.txt").await.expect("preview");
        assert!(preview.content.is_none());
        assert_eq!(
            preview.error.as_deref(),
            Some("File too large (max 1MB). Size: 2.0MB")
        );
    }

    #[tokio::test]
    async fn wrong_kinds_and_missing_paths() {
        let (_dir, root) = fixture().await;
        assert!(matches!(root.read_file("src").await, Err(FileError::IsADirectory)));
        assert!(matches!(root.list_dir("b.txt").await, Err(FileError::NotADirectory)));
        assert!(matches!(root.read_file("nope.md").await, Err(FileError::NotFound)));
        assert_eq!(FileError::AccessDenied.status(), StatusCode::FORBIDDEN);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_out_of_the_root_are_denied() {
        let outside = TempDir::new().expect("tempdir");
        std::fs::write(outside.path().join("secret.txt"), "s").expect("write");
        let (dir, root) = fixture().await;
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).expect("symlink");
        assert!(matches!(
            root.read_file("escape/secret.txt").await,
            Err(FileError::AccessDenied)
        ));
    }
}
