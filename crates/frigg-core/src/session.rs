//! Per-document memory of the files a user picked last time.

use crate::{Error, Result};
use frigg_fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{self, Component, Path, PathBuf};

/// Files last associated with one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_file: Option<PathBuf>,
}

/// Remembered file choices, keyed by document path.
///
/// Documents are keyed by the path of the file being processed: the source
/// document for parameter files, the parameter file for rule and command
/// files. Keys are made absolute and lexically normalized, so `run.sql`,
/// `./run.sql` and `/w/run.sql` (run from `/w`) share one entry. A session lives as long as the caller keeps it; the CLI persists
/// it between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    documents: BTreeMap<PathBuf, DocumentFiles>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self, document: &Path) -> Option<&DocumentFiles> {
        self.documents.get(&document_key(document))
    }

    fn entry(&mut self, document: &Path) -> &mut DocumentFiles {
        self.documents.entry(document_key(document)).or_default()
    }

    pub fn params_file_for(&self, document: &Path) -> Option<&Path> {
        self.files(document)?.params_file.as_deref()
    }

    pub fn remember_params_file(&mut self, document: &Path, params_file: impl Into<PathBuf>) {
        self.entry(document).params_file = Some(params_file.into());
    }

    pub fn rule_file_for(&self, params_file: &Path) -> Option<&Path> {
        self.files(params_file)?.rule_file.as_deref()
    }

    pub fn remember_rule_file(&mut self, params_file: &Path, rule_file: impl Into<PathBuf>) {
        self.entry(params_file).rule_file = Some(rule_file.into());
    }

    pub fn command_file_for(&self, params_file: &Path) -> Option<&Path> {
        self.files(params_file)?.command_file.as_deref()
    }

    pub fn remember_command_file(&mut self, params_file: &Path, command_file: impl Into<PathBuf>) {
        self.entry(params_file).command_file = Some(command_file.into());
    }

    /// Every rule file remembered for any document, deduplicated, sorted.
    pub fn known_rule_files(&self) -> Vec<PathBuf> {
        self.collect(|files| files.rule_file.as_ref())
    }

    /// Every command file remembered for any document, deduplicated, sorted.
    pub fn known_command_files(&self) -> Vec<PathBuf> {
        self.collect(|files| files.command_file.as_ref())
    }

    fn collect<'a>(&'a self, pick: impl Fn(&'a DocumentFiles) -> Option<&'a PathBuf>) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.documents.values().filter_map(pick).cloned().collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Forget everything (end of an editing session).
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Load a session saved by [`Session::save`]; missing file ⇒ empty.
    pub async fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Self> {
        if !fs.exists(path).await? {
            return Ok(Self::new());
        }

        let contents = fs.read_to_string(path).await.map_err(|source| Error::Read {
            file: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| Error::Json {
            file: path.to_path_buf(),
            source,
        })
    }

    pub async fn save<F: FileSystem + ?Sized>(&self, fs: &F, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent).await?;
        }
        fs.write(path, &json).await.map_err(|source| Error::Write {
            file: path.to_path_buf(),
            source,
        })
    }
}

/// Absolute form of `document` with `.` and `..` folded.
///
/// Falls back to the path as given when the working directory is unknown.
fn document_key(document: &Path) -> PathBuf {
    let absolute = path::absolute(document).unwrap_or_else(|_| document.to_path_buf());
    let mut key = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                key.pop();
            }
            other => key.push(other.as_os_str()),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use frigg_fs::MemoryFileSystem;

    #[test]
    fn test_remember_and_recall() {
        let mut session = Session::new();
        let doc = Path::new("/w/run.sql");
        assert!(session.params_file_for(doc).is_none());

        session.remember_params_file(doc, "/w/run.sql.json.prod");
        assert_eq!(
            session.params_file_for(doc),
            Some(Path::new("/w/run.sql.json.prod"))
        );
    }

    #[test]
    fn test_known_files_are_deduplicated() {
        let mut session = Session::new();
        session.remember_rule_file(Path::new("/a.json"), "/rules/t.json");
        session.remember_rule_file(Path::new("/b.json"), "/rules/t.json");
        session.remember_rule_file(Path::new("/c.json"), "/rules/a.json");

        assert_eq!(
            session.known_rule_files(),
            vec![PathBuf::from("/rules/a.json"), PathBuf::from("/rules/t.json")]
        );
        assert!(session.known_command_files().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.remember_command_file(Path::new("/a.json"), "/a.t.txt");
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn test_relative_and_absolute_paths_share_an_entry() {
        let cwd = std::env::current_dir().unwrap();
        let mut session = Session::new();
        session.remember_params_file(Path::new("run.usql"), "run.usql.json.prod");

        assert_eq!(
            session.params_file_for(&cwd.join("run.usql")),
            Some(Path::new("run.usql.json.prod"))
        );
        assert_eq!(
            session.params_file_for(Path::new("./sub/../run.usql")),
            Some(Path::new("run.usql.json.prod"))
        );

        session.remember_params_file(&cwd.join("run.usql"), "run.usql.json");
        assert_eq!(
            session.params_file_for(Path::new("run.usql")),
            Some(Path::new("run.usql.json"))
        );
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/home/u/.frigg/session.json");

        let mut session = Session::new();
        session.remember_params_file(Path::new("/w/run.sql"), "/w/run.sql.json");
        session.save(&fs, path).await.unwrap();

        let loaded = Session::load(&fs, path).await.unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let fs = MemoryFileSystem::new();
        let loaded = Session::load(&fs, Path::new("/none.json")).await.unwrap();
        assert!(loaded.is_empty());
    }
}
