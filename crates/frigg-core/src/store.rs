//! Sidecar persistence and reconciliation of parameter tables.

use crate::params::ParamTable;
use crate::{Error, Result};
use frigg_fs::FileSystem;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extension appended to a document path to name its sidecar file.
pub const SIDECAR_EXTENSION: &str = "json";

/// Extension of the temporary file written before a save is renamed into place.
const TEMP_EXTENSION: &str = "tmp";

/// Default sidecar path for a document: `<document-path>.json`.
pub fn sidecar_path(document: &Path) -> PathBuf {
    append_extension(document, SIDECAR_EXTENSION)
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Reconcile a freshly scanned table with a persisted one.
///
/// Every token in `current` is kept, with each field taken from the persisted
/// copy unless the persisted field is empty. Tokens only present in
/// `persisted` are appended when `delete_missing` is false and dropped
/// otherwise.
pub fn merge(current: &ParamTable, persisted: &ParamTable, delete_missing: bool) -> ParamTable {
    let mut merged: ParamTable = current
        .iter()
        .map(|(token, param)| {
            let param = match persisted.get(token) {
                Some(saved) => param.merged_with(saved),
                None => param.clone(),
            };
            (token.to_string(), param)
        })
        .collect();

    let mut carried = 0usize;
    if !delete_missing {
        for (token, param) in persisted.iter() {
            if !merged.contains_token(token) {
                merged.insert(token, param.clone());
                carried += 1;
            }
        }
    }

    tracing::debug!(
        current = current.len(),
        persisted = persisted.len(),
        carried,
        delete_missing,
        "merged parameter tables"
    );
    merged
}

/// Loads and saves parameter tables through a [`FileSystem`].
pub struct ParamStore<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> ParamStore<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Load a table from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist: sidecars are created
    /// on first use, so absence is expected.
    pub async fn load(&self, path: &Path) -> Result<Option<ParamTable>> {
        if !self.fs.exists(path).await.map_err(|source| Error::Read {
            file: path.to_path_buf(),
            source,
        })? {
            return Ok(None);
        }

        let contents = self
            .fs
            .read_to_string(path)
            .await
            .map_err(|source| Error::Read {
                file: path.to_path_buf(),
                source,
            })?;

        let table = serde_json::from_str(&contents).map_err(|source| Error::Json {
            file: path.to_path_buf(),
            source,
        })?;

        Ok(Some(table))
    }

    /// Save `table` to `path` as pretty-printed JSON.
    ///
    /// Writes to a temporary sibling and renames it over `path`, so a failed
    /// write is reported and never leaves a truncated file in place.
    pub async fn save(&self, table: &ParamTable, path: &Path) -> Result<()> {
        let mut json = table.to_json_pretty()?;
        json.push('\n');

        let temp_path = append_extension(path, TEMP_EXTENSION);
        let write_error = |source| Error::Write {
            file: path.to_path_buf(),
            source,
        };

        self.fs.write(&temp_path, &json).await.map_err(write_error)?;
        if let Err(source) = self.fs.rename(&temp_path, path).await {
            // Best effort: the rename error is the one worth reporting.
            let _ = self.fs.remove_file(&temp_path).await;
            return Err(write_error(source));
        }

        tracing::debug!(path = %path.display(), count = table.len(), "saved parameters");
        Ok(())
    }

    /// Load the persisted table at `path` and merge `current` into it.
    ///
    /// Returns `Ok(None)` when nothing is persisted yet.
    pub async fn update(
        &self,
        current: &ParamTable,
        path: &Path,
        delete_missing: bool,
    ) -> Result<Option<ParamTable>> {
        Ok(self
            .load(path)
            .await?
            .map(|persisted| merge(current, &persisted, delete_missing)))
    }

    /// Parameter-file variants next to `base_path`.
    ///
    /// Lists sibling files whose name starts with the file name of
    /// `base_path` (e.g. `run.sql.json.prod` for `run.sql.json`), excluding
    /// `base_path` itself. Sorted by name.
    pub async fn discover_candidates(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        let Some(base_name) = base_path.file_name().map(OsString::from) else {
            return Ok(Vec::new());
        };
        let dir = match base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !self.fs.exists(&dir).await? {
            return Ok(Vec::new());
        }

        let base_name = base_name.to_string_lossy().into_owned();
        let mut candidates = Vec::new();
        for entry in self.fs.list_dir(&dir).await? {
            let Some(name) = entry.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if name == base_name || !name.starts_with(&base_name) {
                continue;
            }
            // Leftover from an interrupted save.
            if name.ends_with(&format!(".{}", TEMP_EXTENSION)) {
                continue;
            }
            if !self.fs.metadata(&entry).await?.is_file {
                continue;
            }
            candidates.push(entry);
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;
    use frigg_fs::MemoryFileSystem;

    fn table(entries: &[(&str, Param)]) -> ParamTable {
        entries
            .iter()
            .map(|(token, param)| (token.to_string(), param.clone()))
            .collect()
    }

    #[test]
    fn test_sidecar_path_appends_json() {
        assert_eq!(
            sidecar_path(Path::new("/work/run.usql")),
            PathBuf::from("/work/run.usql.json")
        );
    }

    #[test]
    fn test_merge_field_priority() {
        let current = table(&[("@@A@@", Param::named("A"))]);
        let persisted = table(&[("@@A@@", Param::new("A", "42", "int"))]);

        let merged = merge(&current, &persisted, true);
        assert_eq!(merged, table(&[("@@A@@", Param::new("A", "42", "int"))]));
    }

    #[test]
    fn test_merge_delete_missing() {
        let current = table(&[("X", Param::named("X"))]);
        let persisted = table(&[
            ("X", Param::new("X", "1", "")),
            ("Y", Param::new("Y", "2", "")),
        ]);

        let dropped = merge(&current, &persisted, true);
        assert_eq!(dropped.tokens().collect::<Vec<_>>(), vec!["X"]);

        let kept = merge(&current, &persisted, false);
        assert_eq!(kept.tokens().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(kept.get("Y").unwrap().value, "2");
    }

    #[test]
    fn test_merge_empty_persisted_field_keeps_current() {
        let current = table(&[("@@A@@", Param::new("A", "default", ""))]);
        let persisted = table(&[("@@A@@", Param::new("A", "", "int"))]);

        let merged = merge(&current, &persisted, true);
        assert_eq!(merged.get("@@A@@").unwrap(), &Param::new("A", "default", "int"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let t = table(&[
            ("@@A@@", Param::new("A", "1", "int")),
            ("@@B@@", Param::named("B")),
        ]);
        assert_eq!(merge(&t, &t, true), t);
        assert_eq!(merge(&t, &t, false), t);
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let store = ParamStore::new(Arc::new(MemoryFileSystem::new()));
        assert!(store.load(Path::new("/nope.json")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_json_error() {
        let fs = Arc::new(MemoryFileSystem::with_files([("/doc.sql.json", "{not json")]));
        let store = ParamStore::new(fs);

        let err = store.load(Path::new("/doc.sql.json")).await.unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json_without_temp_file() {
        let fs = Arc::new(MemoryFileSystem::new());
        let store = ParamStore::new(fs.clone());
        let t = table(&[("@@A@@", Param::new("A", "1", "int"))]);

        store.save(&t, Path::new("/doc.sql.json")).await.unwrap();

        let written = fs.contents("/doc.sql.json").unwrap();
        assert_eq!(
            written,
            "{\n  \"@@A@@\": {\n    \"name\": \"A\",\n    \"value\": \"1\",\n    \"type\": \"int\"\n  }\n}\n"
        );
        assert!(fs.contents("/doc.sql.json.tmp").is_none());
    }

    #[tokio::test]
    async fn test_update_merges_with_saved_values() {
        let fs = Arc::new(MemoryFileSystem::new());
        let store = ParamStore::new(fs);
        let path = Path::new("/doc.sql.json");

        let saved = table(&[("@@A@@", Param::new("A", "7", "int"))]);
        store.save(&saved, path).await.unwrap();

        let scanned = table(&[("@@A@@", Param::named("A")), ("@@B@@", Param::named("B"))]);
        let merged = store.update(&scanned, path, true).await.unwrap().unwrap();
        assert_eq!(merged.get("@@A@@").unwrap().value, "7");
        assert_eq!(merged.get("@@B@@").unwrap(), &Param::named("B"));
    }

    #[tokio::test]
    async fn test_discover_candidates() {
        let fs = Arc::new(MemoryFileSystem::with_files([
            ("/work/run.sql", ""),
            ("/work/run.sql.json", "{}"),
            ("/work/run.sql.json.prod", "{}"),
            ("/work/run.sql.json.dev", "{}"),
            ("/work/run.sql.json.tmp", "{"),
            ("/work/run.sql.json.prod.tmp", "{"),
            ("/work/other.sql.json", "{}"),
        ]));
        let store = ParamStore::new(fs);

        let found = store
            .discover_candidates(Path::new("/work/run.sql.json"))
            .await
            .unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/work/run.sql.json.dev"),
                PathBuf::from("/work/run.sql.json.prod"),
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_candidates_missing_dir_is_empty() {
        let store = ParamStore::new(Arc::new(MemoryFileSystem::new()));
        let found = store
            .discover_candidates(Path::new("/missing/run.sql.json"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
