//! Rule file loading
//!
//! Reads rule configurations through the `FileSystem` abstraction, writes the
//! empty scaffold for new rule files and works out default locations.

use crate::constants::MAX_RULE_FILE_SIZE;
use crate::{CommandBuilder, Result, RuleConfig, RuleError};
use frigg_core::Session;
use frigg_fs::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the rule file used when nothing else was chosen.
pub const DEFAULT_RULE_FILE_NAME: &str = "template.json";

/// Loads rule files from disk (or any other `FileSystem`)
pub struct RuleLoader<F: FileSystem> {
    fs: Arc<F>,
}

impl<F: FileSystem> RuleLoader<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self { fs }
    }

    /// Load and compile the rule file at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist. Files larger than
    /// [`MAX_RULE_FILE_SIZE`] are rejected before they are read.
    pub async fn load(&self, path: &Path) -> Result<Option<CommandBuilder>> {
        let metadata = self
            .fs
            .metadata(path)
            .await
            .map_err(|e| load_error(path, e))?;

        if !metadata.exists {
            return Ok(None);
        }
        if !metadata.is_file {
            return Err(load_error(path, "not a file"));
        }
        if metadata.size > MAX_RULE_FILE_SIZE {
            return Err(load_error(
                path,
                format!(
                    "file too large ({} bytes, max {} bytes)",
                    metadata.size, MAX_RULE_FILE_SIZE
                ),
            ));
        }

        let contents = self
            .fs
            .read_to_string(path)
            .await
            .map_err(|e| load_error(path, e))?;

        let builder = CommandBuilder::from_json(&contents)?;
        tracing::debug!(
            path = %path.display(),
            rules = builder.rules().len(),
            "loaded rule file"
        );
        Ok(Some(builder))
    }

    /// Write an empty rule configuration to `path`, creating parent
    /// directories as needed.
    pub async fn scaffold(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent).await?;
        }

        let mut json = RuleConfig::scaffold().to_json_pretty()?;
        json.push('\n');
        self.fs.write(path, &json).await?;

        tracing::info!(path = %path.display(), "created rule file");
        Ok(())
    }

    /// `*.json` files directly inside `folder`, sorted by name.
    ///
    /// A folder that does not exist holds no rule files.
    pub async fn discover_rule_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        if !self.fs.exists(folder).await? {
            return Ok(Vec::new());
        }

        let mut rule_files = Vec::new();
        for entry in self.fs.list_dir(folder).await? {
            let is_json = entry
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && self.fs.metadata(&entry).await?.is_file {
                rule_files.push(entry);
            }
        }
        Ok(rule_files)
    }
}

fn load_error(
    path: &Path,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> RuleError {
    RuleError::LoadError {
        path: path.display().to_string(),
        source: source.into(),
    }
}

/// The rule file to offer for `params_file`: the one used last time, else
/// `template.json` in the templates folder.
pub fn default_rule_file(session: &Session, params_file: &Path, templates_folder: &Path) -> PathBuf {
    session
        .rule_file_for(params_file)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| templates_folder.join(DEFAULT_RULE_FILE_NAME))
}

/// Where a built command goes by default: `<dir>/<params stem>.<rule stem>.txt`
/// next to the parameter file.
pub fn default_command_path(params_file: &Path, rule_file: &Path) -> PathBuf {
    let params_stem = params_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rule_stem = rule_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = format!("{}.{}.txt", params_stem, rule_stem);
    match params_file.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
