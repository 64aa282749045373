//! Tree-walking evaluator for parsed format expressions.

use super::parser::{BinaryOperator, Binding, Expr};
use crate::{Result, RuleError};
use std::fmt;

/// The values bound to `name`, `type` and `value` while rendering a rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    /// Match groups of the name pattern (group 0 first).
    pub name: Vec<String>,
    /// Match groups of the type pattern (group 0 first).
    pub type_groups: Vec<String>,
    /// The parameter's raw value.
    pub value: String,
}

/// Runtime value of a format expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    List(Vec<String>),
    Undefined,
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::List(_) => true,
            Value::Undefined => false,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::List(_) => "array",
            Value::Undefined => "undefined",
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Value::Num(n) => *n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Str(s) => parse_numeric(s).unwrap_or(f64::NAN),
            Value::List(_) | Value::Undefined => f64::NAN,
        }
    }

    fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => a == b,
            (a, b) => a == b,
        }
    }

    fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Num(n), Value::Str(s)) | (Value::Str(s), Value::Num(n)) => {
                parse_numeric(s).is_some_and(|parsed| parsed == *n)
            }
            (a, b) => a.strict_eq(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Num(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => f.write_str(&items.join(",")),
            Value::Undefined => Ok(()),
        }
    }
}

/// Numeric reading of a string: surrounding whitespace is ignored and the
/// empty string reads as zero.
fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_infinite())
}

/// Shortest decimal form: `5`, `2.5`, `-0` prints as `0`.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

pub(crate) fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<Value> {
    match expr {
        Expr::StringLiteral(s) => Ok(Value::Str(s.clone())),
        Expr::NumberLiteral(n) => Ok(Value::Num(*n)),
        Expr::BooleanLiteral(b) => Ok(Value::Bool(*b)),
        Expr::Variable(Binding::Name) => Ok(Value::List(bindings.name.clone())),
        Expr::Variable(Binding::Type) => Ok(Value::List(bindings.type_groups.clone())),
        Expr::Variable(Binding::Value) => Ok(Value::Str(bindings.value.clone())),
        Expr::Index { target, index } => {
            let target = evaluate(target, bindings)?;
            let index = evaluate(index, bindings)?;
            index_value(target, &index)
        }
        Expr::Length(target) => match evaluate(target, bindings)? {
            Value::List(items) => Ok(Value::Num(items.len() as f64)),
            Value::Str(s) => Ok(Value::Num(s.chars().count() as f64)),
            Value::Undefined => Err(RuleError::Eval(
                "cannot read 'length' of undefined".to_string(),
            )),
            _ => Ok(Value::Undefined),
        },
        Expr::Not(operand) => Ok(Value::Bool(!evaluate(operand, bindings)?.is_truthy())),
        Expr::Binary {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, bindings)?;
            match operator {
                BinaryOperator::And if !left.is_truthy() => Ok(left),
                BinaryOperator::Or if left.is_truthy() => Ok(left),
                BinaryOperator::And | BinaryOperator::Or => evaluate(right, bindings),
                _ => {
                    let right = evaluate(right, bindings)?;
                    Ok(binary(*operator, &left, &right))
                }
            }
        }
        Expr::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            if evaluate(condition, bindings)?.is_truthy() {
                evaluate(then_branch, bindings)
            } else {
                evaluate(else_branch, bindings)
            }
        }
    }
}

fn index_value(target: Value, index: &Value) -> Result<Value> {
    let position = match index {
        Value::Num(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
        Value::Str(s) => s.parse::<usize>().ok(),
        _ => None,
    };

    match target {
        Value::Undefined => Err(RuleError::Eval(format!(
            "cannot index undefined with {}",
            index
        ))),
        Value::List(items) => Ok(position
            .and_then(|i| items.into_iter().nth(i))
            .map_or(Value::Undefined, Value::Str)),
        Value::Str(s) => Ok(position
            .and_then(|i| s.chars().nth(i))
            .map_or(Value::Undefined, |c| Value::Str(c.to_string()))),
        other => {
            tracing::trace!("indexing a {} yields undefined", other.type_name());
            Ok(Value::Undefined)
        }
    }
}

fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    match operator {
        BinaryOperator::Concat => match (left, right) {
            (Value::Str(_) | Value::List(_), _) | (_, Value::Str(_) | Value::List(_)) => {
                Value::Str(format!("{}{}", display_operand(left), display_operand(right)))
            }
            _ => Value::Num(left.to_number() + right.to_number()),
        },
        BinaryOperator::LooseEq => Value::Bool(left.loose_eq(right)),
        BinaryOperator::LooseNotEq => Value::Bool(!left.loose_eq(right)),
        BinaryOperator::StrictEq => Value::Bool(left.strict_eq(right)),
        BinaryOperator::StrictNotEq => Value::Bool(!left.strict_eq(right)),
        // short-circuited in evaluate
        BinaryOperator::And | BinaryOperator::Or => Value::Undefined,
    }
}

/// String form used by `+`; undefined concatenates as its name.
fn display_operand(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatTemplate;

    fn bindings() -> Bindings {
        Bindings {
            name: vec!["INT_Count".into(), "INT".into(), "Count".into()],
            type_groups: vec!["int".into()],
            value: "5".into(),
        }
    }

    fn eval(src: &str) -> Value {
        let template = FormatTemplate::parse(&format!("${{{}}}", src)).unwrap();
        template.evaluate_single(&bindings()).unwrap()
    }

    #[test]
    fn test_variables() {
        assert_eq!(eval("value"), Value::Str("5".into()));
        assert_eq!(eval("name[2]"), Value::Str("Count".into()));
        assert_eq!(eval("type[0]"), Value::Str("int".into()));
    }

    #[test]
    fn test_out_of_range_index_is_undefined() {
        assert_eq!(eval("name[7]"), Value::Undefined);
        assert_eq!(eval("name[1.5]"), Value::Undefined);
    }

    #[test]
    fn test_indexing_undefined_is_an_error() {
        let template = FormatTemplate::parse("${name[7][0]}").unwrap();
        assert!(matches!(
            template.render(&bindings()),
            Err(RuleError::Eval(_))
        ));
    }

    #[test]
    fn test_string_indexing_and_length() {
        assert_eq!(eval("name[2][0]"), Value::Str("C".into()));
        assert_eq!(eval("name[2].length"), Value::Num(5.0));
        assert_eq!(eval("name.length"), Value::Num(3.0));
    }

    #[test]
    fn test_concat_and_addition() {
        assert_eq!(eval("value + 1"), Value::Str("51".into()));
        assert_eq!(eval("1 + 2"), Value::Num(3.0));
        assert_eq!(eval("true + 1"), Value::Num(2.0));
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval("value == 5"), Value::Bool(true));
        assert_eq!(eval("value === 5"), Value::Bool(false));
        assert_eq!(eval("value === '5'"), Value::Bool(true));
        assert_eq!(eval("type[0] != 'int'"), Value::Bool(false));
        assert_eq!(eval("name[9] === name[8]"), Value::Bool(true));
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(eval("'' || 'fallback'"), Value::Str("fallback".into()));
        assert_eq!(eval("value && name[1]"), Value::Str("INT".into()));
        assert_eq!(eval("!value"), Value::Bool(false));
        assert_eq!(eval("!name[9]"), Value::Bool(true));
    }

    #[test]
    fn test_short_circuit_skips_errors() {
        assert_eq!(eval("false && name[9][0]"), Value::Bool(false));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Num(5.0).to_string(), "5");
        assert_eq!(Value::Num(2.5).to_string(), "2.5");
        assert_eq!(Value::Num(-0.0).to_string(), "0");
        assert_eq!(Value::Num(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::List(vec!["a".into(), "b".into()]).to_string(), "a,b");
        assert_eq!(Value::Undefined.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }
}
