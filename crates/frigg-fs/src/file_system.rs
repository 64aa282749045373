//! FileSystem trait for platform-agnostic filesystem operations.

use std::io;
use std::path::{Path, PathBuf};

/// File metadata compatible across implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Whether the path exists.
    pub exists: bool,
    /// Whether the path is a file (false if directory or doesn't exist).
    pub is_file: bool,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// File size in bytes (0 for directories or non-existent files).
    pub size: u64,
}

impl FileMetadata {
    pub(crate) fn missing() -> Self {
        Self {
            exists: false,
            is_file: false,
            is_dir: false,
            size: 0,
        }
    }
}

/// Filesystem collaborator used by the parameter store and rule loader.
///
/// All methods are async: the native implementation offloads blocking
/// `std::fs` calls to tokio's blocking pool, the in-memory implementation
/// completes immediately.
///
/// Errors are plain `std::io::Error` values. A missing file is reported as
/// `io::ErrorKind::NotFound`; callers that treat absence as a normal outcome
/// check [`FileSystem::exists`] first.
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync {
    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::NotFound` if file doesn't exist.
    /// Returns `io::ErrorKind::InvalidData` if file is not valid UTF-8.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read file contents as bytes.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Get file/directory metadata.
    ///
    /// Returns metadata even if the file doesn't exist (exists=false).
    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Write string contents to a file, overwriting it.
    ///
    /// Parent directories are NOT created automatically.
    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Write bytes to a file, overwriting it.
    async fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Remove a file.
    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Rename a file, replacing the destination.
    ///
    /// Used for atomic file updates (write to .tmp, then rename).
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a directory and all parent directories.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List the entries directly inside `dir`.
    ///
    /// Returns full paths (`dir.join(name)`), sorted by file name.
    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}
