//! Format strings for rule output.
//!
//! A format string is literal text with `${ expr }` interpolations. The
//! expression language is deliberately small: string, number and boolean
//! literals, the three bindings `name`, `type` and `value`, indexing,
//! `.length`, `!`, `+`, equality, `&&`, `||` and the conditional operator.
//!
//! ```
//! use frigg_rule_engine::format::{Bindings, FormatTemplate};
//!
//! let template = FormatTemplate::parse("PARAM_${name[1]}=${value}").unwrap();
//! let bindings = Bindings {
//!     name: vec!["in_path".into(), "path".into()],
//!     type_groups: vec!["".into()],
//!     value: "/tmp".into(),
//! };
//! assert_eq!(template.render(&bindings).unwrap(), "PARAM_path=/tmp");
//! ```

mod eval;
mod lexer;
mod parser;

pub use eval::{Bindings, Value};

use crate::constants::MAX_FORMAT_LENGTH;
use crate::{Result, RuleError};
use parser::Segment;

/// A parsed format string, ready to render against many parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl FormatTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        if source.len() > MAX_FORMAT_LENGTH {
            return Err(RuleError::Format {
                position: MAX_FORMAT_LENGTH,
                message: format!(
                    "format string too long ({} chars, max {})",
                    source.len(),
                    MAX_FORMAT_LENGTH
                ),
            });
        }

        Ok(Self {
            source: source.to_string(),
            segments: parser::parse_segments(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render literal text and interpolations in order.
    pub fn render(&self, bindings: &Bindings) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Interpolation(expr) => {
                    out.push_str(&eval::evaluate(expr, bindings)?.to_string())
                }
            }
        }
        Ok(out)
    }

    #[cfg(test)]
    pub(crate) fn evaluate_single(&self, bindings: &Bindings) -> Result<Value> {
        match self.segments.as_slice() {
            [Segment::Interpolation(expr)] => eval::evaluate(expr, bindings),
            _ => Err(RuleError::Eval("not a single interpolation".to_string())),
        }
    }
}
