//! Condition trees and their in-memory evaluation.
//!
//! A `Condition` is a small boolean expression over entity attributes. The
//! same tree has two back-ends: the direct evaluator in this module and the
//! filter compiler in [`crate::filter`], which must accept exactly the same
//! set of entities (up to the documented superset rule for expressions).

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path;

/// Pluggable evaluator behind [`Condition::Expression`].
///
/// The expression language itself is outside this engine; implementations
/// receive the raw expression string and the entity snapshot. An expression
/// that cannot be evaluated must come back `false`, never panic.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str, entity: &Value) -> bool;
}

/// Evaluator for deployments without an expression language.
///
/// Every expression evaluates to `false`, so a permission gated on an
/// expression denies rather than silently granting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExpressionEvaluator;

impl ExpressionEvaluator for NullExpressionEvaluator {
    fn evaluate(&self, _expression: &str, _entity: &Value) -> bool {
        false
    }
}

/// Comparison operator of a field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    EqualTo,
    In,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Contains,
}

impl Operator {
    /// Apply this operator to an extracted entity value and a literal.
    ///
    /// Type mismatches (ordering a string against a number, `IN` against a
    /// non-list literal) evaluate to `false` rather than erroring.
    pub fn apply(&self, actual: &Value, literal: &Value) -> bool {
        match self {
            Operator::EqualTo => actual == literal,
            Operator::In => match literal {
                Value::Array(items) => items.iter().any(|item| item == actual),
                _ => false,
            },
            Operator::Contains => match (actual, literal) {
                (Value::String(haystack), Value::String(needle)) => {
                    haystack.contains(needle.as_str())
                }
                _ => false,
            },
            Operator::GreaterThan => compare(actual, literal).is_some_and(Ordering::is_gt),
            Operator::GreaterThanOrEqualTo => compare(actual, literal).is_some_and(Ordering::is_ge),
            Operator::LessThan => compare(actual, literal).is_some_and(Ordering::is_lt),
            Operator::LessThanOrEqualTo => compare(actual, literal).is_some_and(Ordering::is_le),
        }
    }
}

/// Ordering over ordinal field types: numbers numerically, strings
/// lexicographically. Anything else is unordered.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// How a container combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

/// Boolean expression node evaluated against an entity.
///
/// The serialized shape (string `type` discriminator: `field` | `expression`
/// | `container`) is the contract with the external deployment process and
/// must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Condition {
    Field {
        path: String,
        operator: Operator,
        value: Value,
    },
    Expression {
        expression: String,
    },
    Container {
        combinator: Combinator,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn field(path: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self::Field {
            path: path.into(),
            operator,
            value,
        }
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Self::Expression {
            expression: expression.into(),
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Self::Container {
            combinator: Combinator::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Self::Container {
            combinator: Combinator::Or,
            conditions,
        }
    }

    /// Evaluate this tree against one materialized entity snapshot.
    ///
    /// A missing or unknown field path evaluates to `false`, never an error.
    /// `AND` short-circuits on the first false child, `OR` on the first true
    /// one. Empty containers are vacuous: `AND([])` is true, `OR([])` is
    /// false.
    pub fn evaluate(&self, entity: &Value, expressions: &dyn ExpressionEvaluator) -> bool {
        match self {
            Condition::Field {
                path,
                operator,
                value,
            } => match path::lookup(entity, path) {
                Some(actual) => operator.apply(actual, value),
                None => false,
            },
            Condition::Expression { expression } => expressions.evaluate(expression, entity),
            Condition::Container {
                combinator,
                conditions,
            } => match combinator {
                Combinator::And => conditions.iter().all(|c| c.evaluate(entity, expressions)),
                Combinator::Or => conditions.iter().any(|c| c.evaluate(entity, expressions)),
            },
        }
    }

    /// True when any node in this tree is an expression condition.
    pub fn contains_expression(&self) -> bool {
        match self {
            Condition::Field { .. } => false,
            Condition::Expression { .. } => true,
            Condition::Container { conditions, .. } => {
                conditions.iter().any(Condition::contains_expression)
            }
        }
    }
}
