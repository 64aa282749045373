use frigg_core::DEFAULT_PARAMETER_PATTERN;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for template downloads, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for frigg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriggConfig {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// User settings
    #[serde(default)]
    pub settings: Settings,
}

impl Default for FriggConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            settings: Settings::default(),
        }
    }
}

impl FriggConfig {
    /// Pretty TOML, as written to config.toml
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Regex that finds placeholders in documents; group 1 is the name
    #[serde(default = "default_parameter_pattern")]
    pub parameter_pattern: String,

    /// Drop saved parameters that no longer appear in the document
    #[serde(default = "default_true")]
    pub delete_missing_params: bool,

    /// Folder holding rule files; `~` expands to the home directory
    #[serde(default = "default_templates_folder")]
    pub templates_folder: String,

    /// GitHub contents API URL listing downloadable rule files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_url: Option<String>,

    /// Timeout for template downloads, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parameter_pattern: default_parameter_pattern(),
            delete_missing_params: default_true(),
            templates_folder: default_templates_folder(),
            templates_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Settings {
    /// The templates folder with `~` expanded.
    pub fn templates_folder_path(&self) -> PathBuf {
        expand_tilde(&self.templates_folder)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Expand a leading `~` (alone or followed by a separator) to the home
/// directory. Other paths, and all paths when no home directory is known,
/// are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_parameter_pattern() -> String {
    DEFAULT_PARAMETER_PATTERN.to_string()
}

fn default_templates_folder() -> String {
    "~".to_string()
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.parameter_pattern, r"@@([^@\s]+)@@");
        assert!(settings.delete_missing_params);
        assert_eq!(settings.templates_folder, "~");
        assert_eq!(settings.templates_url, None);
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: FriggConfig = toml::from_str(
            r#"
            [settings]
            delete_missing_params = false
            templates_url = "https://api.github.com/repos/o/r/contents/templates"
            "#,
        )
        .unwrap();

        assert_eq!(config.version, "1.0");
        assert!(!config.settings.delete_missing_params);
        assert_eq!(config.settings.templates_folder, "~");
        assert!(config.settings.templates_url.is_some());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: FriggConfig = toml::from_str("").unwrap();
        assert_eq!(config, FriggConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = FriggConfig::default();
        config.settings.templates_folder = "/opt/rules".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: FriggConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/path"), PathBuf::from("rel/path"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/rules"), home.join("rules"));
        }
    }
}
