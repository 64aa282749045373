//! Native filesystem implementation using std::fs + tokio.

use crate::{FileMetadata, FileSystem};
use std::io;
use std::path::{Path, PathBuf};
use tokio::task;

/// Native filesystem implementation using std::fs + tokio.
///
/// Documents, their sidecar parameter files and the rules folder can live
/// anywhere on disk, so unlike a project-scoped walker this implementation
/// accepts any path. Relative paths resolve against `base_dir` when one is
/// set, otherwise against the process working directory.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem {
    base_dir: Option<PathBuf>,
}

impl NativeFileSystem {
    /// Create a filesystem that resolves paths against the working directory.
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Create a filesystem that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn join_error(e: task::JoinError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[async_trait::async_trait]
impl FileSystem for NativeFileSystem {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || resolved.try_exists())
            .await
            .map_err(join_error)?
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || std::fs::read_to_string(&resolved))
            .await
            .map_err(join_error)?
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || std::fs::read(&resolved))
            .await
            .map_err(join_error)?
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || match std::fs::metadata(&resolved) {
            Ok(meta) => Ok(FileMetadata {
                exists: true,
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
                size: meta.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileMetadata::missing()),
            Err(e) => Err(e),
        })
        .await
        .map_err(join_error)?
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.write_bytes(path, contents.as_bytes()).await
    }

    async fn write_bytes(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let resolved = self.resolve(path);
        let contents = contents.to_vec();
        task::spawn_blocking(move || std::fs::write(&resolved, contents))
            .await
            .map_err(join_error)?
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || std::fs::remove_file(&resolved))
            .await
            .map_err(join_error)?
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        task::spawn_blocking(move || std::fs::rename(&from, &to))
            .await
            .map_err(join_error)?
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let resolved = self.resolve(path);
        task::spawn_blocking(move || std::fs::create_dir_all(&resolved))
            .await
            .map_err(join_error)?
    }

    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let resolved = self.resolve(dir);
        let requested = dir.to_path_buf();
        task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(&resolved)? {
                let entry = entry?;
                entries.push(requested.join(entry.file_name()));
            }
            entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            Ok(entries)
        })
        .await
        .map_err(join_error)?
    }
}
