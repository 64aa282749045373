use crate::types::FriggConfig;
use frigg_fs::{FileSystem, NativeFileSystem};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Name of the per-user configuration directory under the home directory
pub const CONFIG_DIR_NAME: &str = ".frigg";

/// Errors that can occur during config management
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Manager for frigg configuration
///
/// Manages the user configuration stored in ~/.frigg/config.toml. Tests and
/// embedders can supply their own `FileSystem`.
pub struct ConfigManager<F: FileSystem = NativeFileSystem> {
    fs: Arc<F>,
    config_path: PathBuf,
    config: FriggConfig,
}

impl ConfigManager {
    /// Get the config directory (~/.frigg)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(CONFIG_DIR_NAME))
    }

    /// Get the default config path (~/.frigg/config.toml)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Where the CLI keeps its session between runs (~/.frigg/session.json)
    pub fn session_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Load config from the default location
    ///
    /// A missing file yields the default configuration; nothing is written.
    pub async fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        let fs = Arc::new(NativeFileSystem::new());
        Self::load_or_default_with_filesystem(fs, &config_path).await
    }

    /// Load config from a specific path; the file must exist
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_filesystem(Arc::new(NativeFileSystem::new()), path).await
    }

    /// Initialize a new config file at the default location
    pub async fn init() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::init_at(&config_path).await
    }

    /// Initialize config at specific path
    pub async fn init_at(path: &Path) -> Result<Self, ConfigError> {
        Self::init_with_filesystem(Arc::new(NativeFileSystem::new()), path).await
    }
}

impl<F: FileSystem> ConfigManager<F> {
    /// Load config with a custom FileSystem
    pub async fn load_with_filesystem(fs: Arc<F>, path: &Path) -> Result<Self, ConfigError> {
        if !fs.exists(path).await.map_err(ConfigError::Io)? {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs.read_to_string(path).await.map_err(ConfigError::Io)?;
        let config: FriggConfig = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Self {
            fs,
            config_path: path.to_path_buf(),
            config,
        })
    }

    /// Load config with a custom FileSystem, falling back to defaults when
    /// the file does not exist
    pub async fn load_or_default_with_filesystem(
        fs: Arc<F>,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        match Self::load_with_filesystem(fs.clone(), path).await {
            Err(ConfigError::ConfigNotFound(_)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self {
                    fs,
                    config_path: path.to_path_buf(),
                    config: FriggConfig::default(),
                })
            }
            other => other,
        }
    }

    /// Write the default configuration to `path`, creating its directory
    pub async fn init_with_filesystem(fs: Arc<F>, path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent).await.map_err(ConfigError::Io)?;
        }

        let manager = Self {
            fs,
            config_path: path.to_path_buf(),
            config: FriggConfig::default(),
        };
        manager.save().await?;
        Ok(manager)
    }

    /// Save config to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent corruption
    pub async fn save(&self) -> Result<(), ConfigError> {
        let toml_str = self.config.to_toml_string()?;

        // A defaults-only manager has never touched the config directory.
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent).await.map_err(ConfigError::Io)?;
        }

        // Write to temporary file first
        let temp_path = self.config_path.with_extension("toml.tmp");
        self.fs
            .write(&temp_path, &toml_str)
            .await
            .map_err(ConfigError::Io)?;

        // Atomic rename
        self.fs
            .rename(&temp_path, &self.config_path)
            .await
            .map_err(ConfigError::Io)?;

        Ok(())
    }

    /// Path of the file this configuration was read from (or will be saved to)
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get reference to config
    pub fn config(&self) -> &FriggConfig {
        &self.config
    }

    /// Get mutable reference to config (caller must call save())
    pub fn config_mut(&mut self) -> &mut FriggConfig {
        &mut self.config
    }
}
