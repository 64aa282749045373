//! Frigg Rule Engine - JSON rule files that turn parameter tables into commands
//!
//! A rule configuration pairs a command `Template` with an ordered list of
//! rules. Each rule matches parameters by regex on their name and type and
//! renders a fragment through a small format-expression language. The
//! fragments are joined and substituted for `@@PARAMS@@` in the template.
//!
//! # Architecture
//!
//! - **Schema**: serde types for the rule file (`Template`, `Rules`, ...)
//! - **Compiled Matching**: regex patterns compiled once, scored per parameter
//! - **Format Expressions**: lexer, Pratt parser and evaluator, no scripting
//! - **Loading**: rule files read through the `FileSystem` abstraction
//!
//! # Example
//!
//! ```json
//! {
//!   "Template": "UsqlScript ScriptName=run.usql @@PARAMS@@",
//!   "Rules": [
//!     {"TypePattern": "int", "NamePattern": "(.*)", "Format": "PARAM_${name[1]}=${value}"},
//!     {"TypePattern": "", "NamePattern": "(.*)", "Format": "PARAM_${name[1]}=\"${value}\""}
//!   ]
//! }
//! ```

pub mod builder;
pub mod constants;
pub mod format;
pub mod loader;
pub mod matcher;
pub mod rule;

// Re-export core types
pub use builder::{build, CommandBuilder};
pub use constants::*;
pub use format::{Bindings, FormatTemplate, Value};
pub use loader::{default_command_path, default_rule_file, RuleLoader, DEFAULT_RULE_FILE_NAME};
pub use matcher::CompiledRule;
pub use rule::{Rule, RuleConfig};

/// Result type for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error types for rule engine
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Invalid rule configuration: {reason}")]
    Schema { reason: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid format at position {position}: {message}")]
    Format { position: usize, message: String },

    #[error("Format evaluation failed: {0}")]
    Eval(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load rules from {path}: {source}")]
    LoadError {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
