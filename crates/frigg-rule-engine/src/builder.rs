//! Command builder - applies compiled rules to a parameter table
//!
//! Every parameter is matched against all rules; the most specific rule
//! renders a fragment. Fragments are grouped by rule position so the output
//! follows the order of the rule file, then joined into the template.

use crate::constants::PARAMS_MARKER;
use crate::{CompiledRule, Result, RuleConfig};
use frigg_core::{Param, ParamTable};

/// A validated rule configuration ready to render parameter tables
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    config: RuleConfig,
    rules: Vec<CompiledRule>,
}

impl CommandBuilder {
    /// Compile every rule of `config`; one invalid rule rejects the whole
    /// configuration.
    pub fn from_config(config: RuleConfig) -> Result<Self> {
        let rules = config
            .rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, rules })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_config(RuleConfig::from_json(json)?)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Index of the rule that matches `param` most specifically.
    ///
    /// A later rule only replaces the current pick when its score is strictly
    /// higher, so ties go to the earlier rule. A rule must score above zero to
    /// be picked: rules that match only through empty patterns never win.
    pub fn best_rule(&self, param: &Param) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_score = 0;

        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(score) = rule.match_score(param) {
                if score > best_score {
                    best_score = score;
                    best = Some(index);
                }
            }
        }

        best
    }

    /// Render `params` into the template.
    ///
    /// Parameters without a qualifying rule contribute nothing.
    pub fn render(&self, params: &ParamTable) -> Result<String> {
        let mut buckets: Vec<Vec<String>> = vec![Vec::new(); self.rules.len()];

        for (token, param) in params.iter() {
            match self.best_rule(param) {
                Some(index) => {
                    tracing::debug!(token, rule = index, "rule selected");
                    buckets[index].push(self.rules[index].apply(param)?);
                }
                None => {
                    tracing::debug!(token, "no rule matches, parameter skipped");
                }
            }
        }

        let fragments: Vec<String> = buckets.into_iter().flatten().collect();
        Ok(self
            .config
            .template
            .replacen(PARAMS_MARKER, &fragments.join(" "), 1))
    }
}

/// Build a command from a rule file's JSON and a parameter table.
///
/// Returns `None` when the configuration is invalid or a fragment fails to
/// render. Use [`CommandBuilder::from_json`] and [`CommandBuilder::render`]
/// to learn why.
pub fn build(rule_config_json: &str, params: &ParamTable) -> Option<String> {
    let result = CommandBuilder::from_json(rule_config_json).and_then(|b| b.render(params));
    match result {
        Ok(command) => Some(command),
        Err(e) => {
            tracing::debug!(error = %e, "command build failed");
            None
        }
    }
}
