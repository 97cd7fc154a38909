//! Pushdown filter AST and the condition-to-filter compiler.
//!
//! The `Filter` AST is the backend-agnostic form of a condition tree, meant
//! to be rendered by a persistence adapter (SQL, document query, ...) so list
//! queries only return authorized rows. The in-memory [`Filter::matches`]
//! interpreter exists so the translation invariant can be stated and tested:
//! for an exact plan, `filter.matches(entity)` equals
//! `condition.evaluate(entity)` for every entity.

use serde_json::Value;

use crate::condition::{Combinator, Condition, Operator};
use crate::path;

/// Backend-agnostic query predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every entity.
    All,
    /// Matches no entity.
    Nothing,
    /// Compares the value at `path` against a literal.
    Compare {
        path: String,
        operator: Operator,
        value: Value,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Evaluate this filter against an entity snapshot, with the same
    /// missing-path and empty-container semantics as the condition evaluator.
    pub fn matches(&self, entity: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Nothing => false,
            Filter::Compare {
                path,
                operator,
                value,
            } => match path::lookup(entity, path) {
                Some(actual) => operator.apply(actual, value),
                None => false,
            },
            Filter::And(children) => children.iter().all(|f| f.matches(entity)),
            Filter::Or(children) => children.iter().any(|f| f.matches(entity)),
        }
    }
}

/// A compiled pushdown plan.
///
/// When `exact` is false the filter is a *superset* of the in-memory
/// predicate (never a subset): extra rows may come back from the store and
/// must be re-checked in memory before being released to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub filter: Filter,
    pub exact: bool,
}

impl FilterPlan {
    pub fn exact(filter: Filter) -> Self {
        Self {
            filter,
            exact: true,
        }
    }

    /// Plan that authorizes nothing (no permission matched).
    pub fn nothing() -> Self {
        Self::exact(Filter::Nothing)
    }

    /// True when fetched entities must be re-checked with the in-memory
    /// evaluator before being returned.
    pub fn requires_post_filter(&self) -> bool {
        !self.exact
    }

    /// OR a set of per-permission plans together. The union of supersets is a
    /// superset of the union, so the combined plan is exact only when every
    /// contributing plan is.
    pub fn any<I: IntoIterator<Item = FilterPlan>>(plans: I) -> Self {
        let plans: Vec<FilterPlan> = plans.into_iter().collect();
        if plans.is_empty() {
            return Self::nothing();
        }
        let exact = plans.iter().all(|p| p.exact);
        Self {
            filter: Filter::Or(plans.into_iter().map(|p| p.filter).collect()),
            exact,
        }
    }
}

impl Condition {
    /// Translate this tree into a pushdown plan.
    ///
    /// Expression conditions have no filter translation; they widen to
    /// [`Filter::All`] and mark the plan inexact. Widening keeps the filter a
    /// superset of the true predicate in both `AND` and `OR` positions, so an
    /// unauthorized entity is never let through by the filter alone.
    pub fn compile(&self) -> FilterPlan {
        match self {
            Condition::Field {
                path,
                operator,
                value,
            } => FilterPlan::exact(Filter::Compare {
                path: path.clone(),
                operator: *operator,
                value: value.clone(),
            }),
            Condition::Expression { .. } => FilterPlan {
                filter: Filter::All,
                exact: false,
            },
            Condition::Container {
                combinator,
                conditions,
            } => {
                let plans: Vec<FilterPlan> = conditions.iter().map(Condition::compile).collect();
                let exact = plans.iter().all(|p| p.exact);
                let children: Vec<Filter> = plans.into_iter().map(|p| p.filter).collect();
                let filter = match combinator {
                    Combinator::And => Filter::And(children),
                    Combinator::Or => Filter::Or(children),
                };
                FilterPlan { filter, exact }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::NullExpressionEvaluator;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn field_condition_compiles_to_exact_compare() {
        let condition = Condition::field("document.name", Operator::In, json!(["loan"]));
        let plan = condition.compile();
        assert!(plan.exact);
        assert!(!plan.requires_post_filter());
        assert_eq!(
            plan.filter,
            Filter::Compare {
                path: "document.name".to_string(),
                operator: Operator::In,
                value: json!(["loan"]),
            }
        );
    }

    #[test]
    fn expression_condition_widens_to_all_and_marks_plan_inexact() {
        let plan = Condition::expression("custom(entity)").compile();
        assert_eq!(plan.filter, Filter::All);
        assert!(plan.requires_post_filter());
    }

    #[test]
    fn inexact_child_propagates_through_containers() {
        let condition = Condition::and(vec![
            Condition::field("document.name", Operator::EqualTo, json!("loan")),
            Condition::or(vec![Condition::expression("custom(entity)")]),
        ]);
        let plan = condition.compile();
        assert!(plan.requires_post_filter());

        // Widened filter stays a superset: every entity the condition accepts
        // also passes the filter.
        let entity = json!({"document": {"name": "loan"}});
        assert!(plan.filter.matches(&entity));
    }

    #[test]
    fn empty_containers_match_vacuously() {
        let entity = json!({});
        assert!(Condition::and(vec![]).compile().filter.matches(&entity));
        assert!(!Condition::or(vec![]).compile().filter.matches(&entity));
    }

    #[test]
    fn plan_of_no_permissions_authorizes_nothing() {
        let plan = FilterPlan::any(vec![]);
        assert_eq!(plan.filter, Filter::Nothing);
        assert!(plan.exact);
        assert!(!plan.filter.matches(&json!({"document": {"name": "loan"}})));
    }

    #[test]
    fn any_is_exact_only_when_all_plans_are() {
        let exact = Condition::field("a", Operator::EqualTo, json!(1)).compile();
        let inexact = Condition::expression("x").compile();
        assert!(FilterPlan::any(vec![exact.clone(), exact.clone()]).exact);
        assert!(!FilterPlan::any(vec![exact, inexact]).exact);
    }

    // Generators for the consistency property: arbitrary Field/Container
    // trees over a small closed attribute vocabulary, so paths sometimes hit
    // and sometimes miss.

    fn any_literal() -> impl Strategy<Value = Value> {
        prop_oneof![
            prop::sample::select(vec!["loan", "gift", "invoice"]).prop_map(|s| json!(s)),
            (0i64..500).prop_map(|n| json!(n)),
            prop::collection::vec(
                prop::sample::select(vec!["loan", "gift", "invoice"]),
                0..3
            )
            .prop_map(|items| json!(items)),
        ]
    }

    fn any_operator() -> impl Strategy<Value = Operator> {
        prop::sample::select(vec![
            Operator::EqualTo,
            Operator::In,
            Operator::GreaterThan,
            Operator::GreaterThanOrEqualTo,
            Operator::LessThan,
            Operator::LessThanOrEqualTo,
            Operator::Contains,
        ])
    }

    fn any_field_condition() -> impl Strategy<Value = Condition> {
        (
            prop::sample::select(vec![
                "document.name",
                "document.amount",
                "owner",
                "document.missing",
            ]),
            any_operator(),
            any_literal(),
        )
            .prop_map(|(path, operator, value)| Condition::field(path, operator, value))
    }

    fn any_condition() -> impl Strategy<Value = Condition> {
        any_field_condition().prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_flat_map(|children| {
                prop_oneof![
                    Just(Condition::and(children.clone())),
                    Just(Condition::or(children)),
                ]
            })
        })
    }

    fn any_entity() -> impl Strategy<Value = Value> {
        (
            prop::sample::select(vec!["loan", "gift", "invoice"]),
            0i64..500,
            prop::option::of(prop::sample::select(vec!["alice", "bob"])),
        )
            .prop_map(|(name, amount, owner)| {
                let mut entity = json!({"document": {"name": name, "amount": amount}});
                if let Some(owner) = owner {
                    entity["owner"] = json!(owner);
                }
                entity
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: for expression-free trees the compiled plan is exact and
        /// the pushdown filter accepts exactly the entities the in-memory
        /// evaluator accepts.
        #[test]
        fn pushdown_filter_agrees_with_in_memory_evaluation(
            condition in any_condition(),
            entity in any_entity(),
        ) {
            let plan = condition.compile();
            prop_assert!(plan.exact);
            prop_assert_eq!(
                plan.filter.matches(&entity),
                condition.evaluate(&entity, &NullExpressionEvaluator)
            );
        }

        /// Property: widening expression nodes keeps the filter a superset of
        /// the in-memory predicate, never a subset.
        #[test]
        fn inexact_filter_is_a_superset_of_the_predicate(
            condition in any_condition(),
            entity in any_entity(),
            expression_outcome in any::<bool>(),
        ) {
            struct Fixed(bool);
            impl crate::condition::ExpressionEvaluator for Fixed {
                fn evaluate(&self, _expression: &str, _entity: &Value) -> bool {
                    self.0
                }
            }

            let with_expression = Condition::and(vec![
                condition,
                Condition::expression("opaque(entity)"),
            ]);
            let plan = with_expression.compile();
            prop_assert!(plan.requires_post_filter());
            if with_expression.evaluate(&entity, &Fixed(expression_outcome)) {
                prop_assert!(plan.filter.matches(&entity));
            }
        }
    }
}
