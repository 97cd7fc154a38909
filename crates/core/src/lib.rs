//! `resauth-core` — condition interpreter and pushdown filter building blocks.
//!
//! This crate contains the **pure evaluation** half of the authorization
//! engine: condition trees, the in-memory evaluator, and the filter compiler.
//! No I/O, no registries, no wiring.

pub mod condition;
pub mod error;
pub mod filter;
pub mod path;

pub use condition::{Combinator, Condition, ExpressionEvaluator, NullExpressionEvaluator, Operator};
pub use error::{AuthzError, AuthzResult};
pub use filter::{Filter, FilterPlan};
