//! In-memory filesystem implementation.

use crate::{FileMetadata, FileSystem};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// In-memory filesystem.
///
/// Files live in a map keyed by normalized path. Directories are implicit:
/// a directory exists when it was created explicitly or when any file lives
/// below it.
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<..>>` for interior mutability, so clones share state.
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem pre-loaded with files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<Vec<u8>>,
    {
        let fs = Self::new();
        for (path, contents) in files {
            fs.add_file(path, contents);
        }
        fs
    }

    /// Add a file (used during test setup).
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let normalized = normalize(path.as_ref());
        self.files.write().insert(normalized, contents.into());
    }

    /// Snapshot of a file's contents as UTF-8, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let normalized = normalize(path.as_ref());
        self.files
            .read()
            .get(&normalized)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// The root and relative bases always exist.
    fn parent_exists(&self, parent: &Path) -> bool {
        parent.parent().is_none() || parent.as_os_str().is_empty() || self.is_dir(parent)
    }

    fn is_dir(&self, path: &Path) -> bool {
        if self.dirs.read().contains(path) {
            return true;
        }
        self.files
            .read()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

/// Syntactic normalization: drops `.` and folds `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("File not found: {}", path.display()),
    )
}

#[async_trait::async_trait]
impl FileSystem for MemoryFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let normalized = normalize(path);
        let is_file = self.files.read().contains_key(&normalized);
        Ok(is_file || self.is_dir(&normalized))
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let normalized = normalize(path);
        self.files
            .read()
            .get(&normalized)
            .cloned()
            .ok_or_else(|| not_found(&normalized))
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let normalized = normalize(path);
        if let Some(contents) = self.files.read().get(&normalized) {
            return Ok(FileMetadata {
                exists: true,
                is_file: true,
                is_dir: false,
                size: contents.len() as u64,
            });
        }
        if self.is_dir(&normalized) {
            return Ok(FileMetadata {
                exists: true,
                is_file: false,
                is_dir: true,
                size: 0,
            });
        }
        Ok(FileMetadata::missing())
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.write_bytes(path, contents.as_bytes()).await
    }

    async fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let normalized = normalize(path);
        if self.is_dir(&normalized) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Is a directory: {}", normalized.display()),
            ));
        }
        if let Some(parent) = normalized.parent() {
            if !self.parent_exists(parent) {
                return Err(not_found(parent));
            }
        }
        self.files.write().insert(normalized, contents.to_vec());
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        let normalized = normalize(path);
        self.files
            .write()
            .remove(&normalized)
            .map(|_| ())
            .ok_or_else(|| not_found(&normalized))
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = normalize(from);
        let to = normalize(to);
        let mut files = self.files.write();
        let contents = files.remove(&from).ok_or_else(|| not_found(&from))?;
        files.insert(to, contents);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let normalized = normalize(path);
        let mut dirs = self.dirs.write();
        for ancestor in normalized.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let normalized = normalize(dir);
        if !self.is_dir(&normalized) {
            return Err(not_found(&normalized));
        }

        let mut names = BTreeSet::new();
        let files = self.files.read();
        let dirs = self.dirs.read();
        for path in files.keys().chain(dirs.iter()) {
            if let Ok(rest) = path.strip_prefix(&normalized) {
                if let Some(Component::Normal(first)) = rest.components().next() {
                    names.insert(first.to_os_string());
                }
            }
        }

        Ok(names.into_iter().map(|name| dir.join(name)).collect())
    }
}
