//! Everything a command needs: filesystem, configuration, session, chooser.

use crate::chooser::Chooser;
use crate::display;
use anyhow::{Context, Result};
use frigg_config::{ConfigManager, Settings};
use frigg_core::{Session, TokenPattern};
use frigg_fs::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppContext<F: FileSystem> {
    pub fs: Arc<F>,
    pub config: ConfigManager<F>,
    pub session: Session,
    session_path: Option<PathBuf>,
    chooser: Box<dyn Chooser>,
}

impl<F: FileSystem> AppContext<F> {
    /// A context with an empty, unpersisted session.
    pub fn new(fs: Arc<F>, config: ConfigManager<F>, chooser: Box<dyn Chooser>) -> Self {
        Self {
            fs,
            config,
            session: Session::new(),
            session_path: None,
            chooser,
        }
    }

    /// Restore the session stored at `path` and persist it there afterwards.
    ///
    /// An unreadable session file only costs the remembered choices, so it
    /// is reported and replaced by an empty session.
    pub async fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session = match Session::load(self.fs.as_ref(), &path).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session file");
                Session::new()
            }
        };
        self.session_path = Some(path);
        self
    }

    pub async fn persist_session(&self) -> Result<()> {
        if let Some(path) = &self.session_path {
            self.session
                .save(self.fs.as_ref(), path)
                .await
                .with_context(|| format!("Failed to save session to {}", path.display()))?;
        }
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.config.config().settings
    }

    pub fn templates_folder(&self) -> PathBuf {
        self.settings().templates_folder_path()
    }

    /// The configured placeholder pattern; an invalid one falls back to the
    /// default with a warning.
    pub fn token_pattern(&self) -> TokenPattern {
        let configured = self.settings().parameter_pattern.as_str();
        let (pattern, warning) =
            TokenPattern::from_setting(Some(configured).filter(|p| !p.is_empty()));
        if let Some(warning) = warning {
            display::warning(&warning.to_string());
        }
        pattern
    }

    pub fn choose(
        &mut self,
        prompt: &str,
        candidates: &[PathBuf],
        default: &Path,
    ) -> io::Result<Option<PathBuf>> {
        self.chooser.choose(prompt, candidates, default)
    }
}
