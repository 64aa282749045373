//! Rule file schema
//!
//! Keys follow the rule file format (`Template`, `Rules`, `TypePattern`,
//! `NamePattern`, `Format`). Older files spelled them in lower or camel case,
//! so those spellings are accepted as aliases.

use crate::{Result, RuleError};
use serde::{Deserialize, Serialize};

/// A complete rule configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Command template containing the `@@PARAMS@@` marker
    #[serde(rename = "Template", alias = "template")]
    pub template: String,

    /// Ordered rules; earlier rules win ties
    #[serde(rename = "Rules", alias = "rules")]
    pub rules: Vec<Rule>,
}

/// A single formatting rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Regex on the parameter type; empty matches anything
    #[serde(
        rename = "TypePattern",
        alias = "typePattern",
        alias = "type_pattern",
        alias = "typepattern",
        default
    )]
    pub type_pattern: String,

    /// Regex on the parameter name; empty matches anything
    #[serde(
        rename = "NamePattern",
        alias = "namePattern",
        alias = "name_pattern",
        alias = "namepattern",
        default
    )]
    pub name_pattern: String,

    /// Format string rendered for each matching parameter
    #[serde(rename = "Format", alias = "format")]
    pub format: String,
}

impl Rule {
    pub fn new(
        type_pattern: impl Into<String>,
        name_pattern: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            type_pattern: type_pattern.into(),
            name_pattern: name_pattern.into(),
            format: format.into(),
        }
    }
}

impl RuleConfig {
    /// The configuration written when a rule file does not exist yet.
    pub fn scaffold() -> Self {
        Self::default()
    }

    /// Parse a rule file.
    ///
    /// Malformed JSON is reported as [`RuleError::Json`]; well-formed JSON
    /// with the wrong shape as [`RuleError::Schema`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                RuleError::Schema {
                    reason: e.to_string(),
                }
            } else {
                RuleError::Json(e)
            }
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(RuleError::Json)
    }
}
