//! Compiled rules with regex caching
//!
//! Rule patterns are compiled once when a configuration is loaded and then
//! scored against every parameter in the table.

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::format::{Bindings, FormatTemplate};
use crate::{Result, Rule, RuleError};
use frigg_core::Param;
use regex::{Regex, RegexBuilder};

/// Compile a regex with size limits to prevent ReDoS attacks
///
/// - Pattern length limit (500 chars)
/// - Compiled regex size limit (10MB)
/// - DFA size limit (2MB)
pub fn compile_regex_safe(pattern: &str) -> Result<Regex> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(RuleError::InvalidPattern(format!(
            "Pattern exceeds maximum length of {} characters",
            MAX_REGEX_LENGTH
        )));
    }

    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleError::InvalidPattern(format!("{}: {}", pattern, e)))
}

/// Empty patterns compile to `None` and match anything.
fn compile_optional(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        compile_regex_safe(pattern).map(Some)
    }
}

/// A rule ready for scoring and rendering
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: Rule,
    name_regex: Option<Regex>,
    type_regex: Option<Regex>,
    format: FormatTemplate,
}

impl CompiledRule {
    /// Compile both patterns and parse the format string.
    pub fn compile(rule: &Rule) -> Result<Self> {
        Ok(Self {
            name_regex: compile_optional(&rule.name_pattern)?,
            type_regex: compile_optional(&rule.type_pattern)?,
            format: FormatTemplate::parse(&rule.format)?,
            rule: rule.clone(),
        })
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Score how specifically this rule matches `param`.
    ///
    /// The score is the number of groups (including the whole match) of the
    /// name match plus those of the type match. An empty pattern adds
    /// nothing. Returns `None` when a non-empty pattern fails to match.
    pub fn match_score(&self, param: &Param) -> Option<usize> {
        let name = match_count(self.name_regex.as_ref(), &param.name)?;
        let type_count = match_count(self.type_regex.as_ref(), &param.param_type)?;
        Some(name + type_count)
    }

    /// Render this rule's format for `param`, trimmed.
    ///
    /// `name` and `type` are bound to the match groups of the respective
    /// patterns (groups that did not participate are `""`). An empty pattern
    /// binds a single element holding the raw field.
    pub fn apply(&self, param: &Param) -> Result<String> {
        let bindings = Bindings {
            name: match_groups(self.name_regex.as_ref(), &param.name),
            type_groups: match_groups(self.type_regex.as_ref(), &param.param_type),
            value: param.value.clone(),
        };

        Ok(self.format.render(&bindings)?.trim().to_string())
    }
}

fn match_count(regex: Option<&Regex>, content: &str) -> Option<usize> {
    match regex {
        None => Some(0),
        Some(regex) => regex.captures(content).map(|caps| caps.len()),
    }
}

fn match_groups(regex: Option<&Regex>, content: &str) -> Vec<String> {
    let Some(regex) = regex else {
        return vec![content.to_string()];
    };

    regex
        .captures(content)
        .map(|caps| {
            caps.iter()
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect()
        })
        .unwrap_or_default()
}
