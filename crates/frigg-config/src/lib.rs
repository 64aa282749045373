pub mod manager;
pub mod types;

pub use manager::{ConfigError, ConfigManager};
pub use types::{expand_tilde, FriggConfig, Settings, DEFAULT_FETCH_TIMEOUT_SECS};
