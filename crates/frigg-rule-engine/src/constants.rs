//! Limits and markers for rule files
//!
//! Rule files are user-authored and may be downloaded, so their patterns and
//! format expressions are bounded:
//! - ReDoS (Regular Expression Denial of Service)
//! - Memory exhaustion
//! - Runaway expression nesting

/// Marker in a rule configuration's template replaced by the rendered
/// parameter fragments.
pub const PARAMS_MARKER: &str = "@@PARAMS@@";

/// Maximum size for JSON rule files (1MB)
pub const MAX_RULE_FILE_SIZE: u64 = 1_048_576; // 1MB

/// Maximum regex pattern length (500 characters)
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Maximum length of a rule's format string (4096 characters)
pub const MAX_FORMAT_LENGTH: usize = 4096;

/// Maximum nesting depth of a format expression
pub const MAX_EXPRESSION_DEPTH: usize = 64;
