//! Placeholder discovery in document text.

use crate::params::{Param, ParamTable};
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Pattern used when no `parameter_pattern` is configured or the configured
/// one does not compile.
pub const DEFAULT_PARAMETER_PATTERN: &str = r"@@([^@\s]+)@@";

/// Maximum length of a user-supplied token pattern.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Compiled regex size limit for token patterns (10MB).
const REGEX_SIZE_LIMIT: usize = 10_000_000;

/// A compiled placeholder pattern.
///
/// Capture group 1, when it participates in a match, is the parameter name.
/// Without it the whole token is used as the name.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
}

/// Reported when the configured pattern was unusable and the default was
/// substituted. Non-fatal, but callers should show it to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWarning {
    pub pattern: String,
    pub reason: String,
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid parameter pattern '{}' ({}), using default pattern {}",
            self.pattern, self.reason, DEFAULT_PARAMETER_PATTERN
        )
    }
}

impl TokenPattern {
    /// Compile a token pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("exceeds {} characters", MAX_PATTERN_LENGTH),
            });
        }

        let regex = RegexBuilder::new(pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { regex })
    }

    /// Resolve the configured pattern, falling back to the default.
    ///
    /// `None` means nothing was configured and yields the default silently.
    pub fn from_setting(configured: Option<&str>) -> (Self, Option<PatternWarning>) {
        let Some(pattern) = configured else {
            return (Self::default(), None);
        };

        match Self::new(pattern) {
            Ok(compiled) => (compiled, None),
            Err(e) => {
                let reason = match e {
                    Error::InvalidPattern { reason, .. } => reason,
                    other => other.to_string(),
                };
                let warning = PatternWarning {
                    pattern: pattern.to_string(),
                    reason,
                };
                tracing::warn!("{}", warning);
                (Self::default(), Some(warning))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for TokenPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PARAMETER_PATTERN)
                .expect("default parameter pattern is valid"),
        }
    }
}

/// Collect every placeholder in `text`.
///
/// Repeated tokens collapse into one entry at the position of their first
/// occurrence. Values and types are always empty: scanning only discovers
/// which placeholders exist.
pub fn scan(text: &str, pattern: &TokenPattern) -> ParamTable {
    let mut table = ParamTable::new();

    for captures in pattern.regex.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        // Empty matches (e.g. a pattern like `x*`) would flood the table.
        if whole.as_str().is_empty() {
            continue;
        }

        let token = whole.as_str();
        if table.contains_token(token) {
            continue;
        }

        let name = captures.get(1).map_or(token, |m| m.as_str());
        table.insert(token, Param::named(name));
    }

    tracing::debug!(
        pattern = pattern.as_str(),
        count = table.len(),
        "scanned document for parameters"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_default_pattern() {
        let table = scan("run @@Input1@@ and @@Output@@ now", &TokenPattern::default());

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("@@Input1@@"), Some(&Param::named("Input1")));
        assert_eq!(table.get("@@Output@@"), Some(&Param::named("Output")));
        assert!(table.params().all(|p| p.value.is_empty() && p.param_type.is_empty()));
    }

    #[test]
    fn test_duplicates_collapse() {
        let table = scan("@@A@@ @@B@@ @@A@@", &TokenPattern::default());
        let tokens: Vec<_> = table.tokens().collect();
        assert_eq!(tokens, vec!["@@A@@", "@@B@@"]);
    }

    #[test]
    fn test_default_pattern_skips_whitespace_and_at() {
        let table = scan("@@not valid@@ @@@@ @@ok@@", &TokenPattern::default());
        let names: Vec<_> = table.params().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_pattern_without_group_uses_whole_token() {
        let pattern = TokenPattern::new(r"\$[A-Z]+").unwrap();
        let table = scan("echo $HOME $USER", &pattern);
        assert_eq!(table.get("$HOME").unwrap().name, "$HOME");
    }

    #[test]
    fn test_custom_pattern_with_group() {
        let pattern = TokenPattern::new(r"\{\{(\w+)\}\}").unwrap();
        let table = scan("hello {{who}}", &pattern);
        assert_eq!(table.get("{{who}}").unwrap().name, "who");
    }

    #[test]
    fn test_invalid_setting_falls_back_with_warning() {
        let (pattern, warning) = TokenPattern::from_setting(Some("@@([^@"));
        assert_eq!(pattern.as_str(), DEFAULT_PARAMETER_PATTERN);
        let warning = warning.expect("fallback should be reported");
        assert_eq!(warning.pattern, "@@([^@");
        assert!(warning.to_string().contains(DEFAULT_PARAMETER_PATTERN));
    }

    #[test]
    fn test_unset_setting_uses_default_silently() {
        let (pattern, warning) = TokenPattern::from_setting(None);
        assert_eq!(pattern.as_str(), DEFAULT_PARAMETER_PATTERN);
        assert!(warning.is_none());
    }

    #[test]
    fn test_overlong_pattern_rejected() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            TokenPattern::new(&long),
            Err(Error::InvalidPattern { .. })
        ));
    }
}
