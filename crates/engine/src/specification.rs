//! Authorization specifications and their factories.

use std::sync::Arc;

use serde_json::Value;

use resauth_core::{ExpressionEvaluator, FilterPlan};

use crate::permission::Permission;
use crate::request::RequestMeta;
use crate::resource::Resource;

/// Request-scoped bundle of the resolved permissions, exposing both
/// evaluation modes.
///
/// Instances are created per request and discarded after use; they are never
/// shared across concurrent requests.
pub trait AuthorizationSpecification {
    /// True iff at least one matching permission's condition tree evaluates
    /// true for `entity` — grants are OR'd, any one suffices.
    fn is_authorized(&self, entity: &Value) -> bool;

    /// Pushdown plan for scoping list/search queries to authorized rows.
    ///
    /// When the plan is inexact the caller must re-check fetched entities
    /// with [`AuthorizationSpecification::is_authorized`].
    fn filter(&self) -> FilterPlan;
}

/// Builds specifications for the resource types it handles.
///
/// Factories are tried in explicit registration order; the first one whose
/// `can_create` returns true wins. The order is a visible configuration
/// artifact of the assembling application.
pub trait AuthorizationSpecificationFactory: Send + Sync {
    fn can_create(&self, request: &RequestMeta<'_>) -> bool;

    /// Build a specification from the subset of `permissions` matching the
    /// request's `(resource_type, action)`. Role filtering has already
    /// happened at permission lookup.
    fn create(
        &self,
        request: &RequestMeta<'_>,
        permissions: &[Permission],
    ) -> Box<dyn AuthorizationSpecification>;
}

/// Stock specification: evaluates the condition trees of the matching
/// permissions.
pub struct ConditionSpecification {
    permissions: Vec<Permission>,
    expressions: Arc<dyn ExpressionEvaluator + Send + Sync>,
}

impl ConditionSpecification {
    pub fn new(
        permissions: Vec<Permission>,
        expressions: Arc<dyn ExpressionEvaluator + Send + Sync>,
    ) -> Self {
        Self {
            permissions,
            expressions,
        }
    }

    /// The permissions this specification was built from.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

impl AuthorizationSpecification for ConditionSpecification {
    fn is_authorized(&self, entity: &Value) -> bool {
        self.permissions
            .iter()
            .any(|p| p.conditions().evaluate(entity, self.expressions.as_ref()))
    }

    fn filter(&self) -> FilterPlan {
        // No matching permission means "authorize nothing", not an error.
        FilterPlan::any(self.permissions.iter().map(|p| p.conditions().compile()))
    }
}

/// Stock factory producing [`ConditionSpecification`]s.
///
/// By default it handles every resource type, which makes it the natural
/// tail of the registration list; narrowed instances (`for_resource`) can be
/// registered ahead of it.
pub struct ConditionSpecificationFactory {
    resource_type: Option<&'static str>,
    expressions: Arc<dyn ExpressionEvaluator + Send + Sync>,
}

impl ConditionSpecificationFactory {
    pub fn new(expressions: Arc<dyn ExpressionEvaluator + Send + Sync>) -> Self {
        Self {
            resource_type: None,
            expressions,
        }
    }

    /// Restrict this factory to a single resource type.
    pub fn for_resource<R: Resource>(
        expressions: Arc<dyn ExpressionEvaluator + Send + Sync>,
    ) -> Self {
        Self {
            resource_type: Some(R::KEY),
            expressions,
        }
    }
}

impl AuthorizationSpecificationFactory for ConditionSpecificationFactory {
    fn can_create(&self, request: &RequestMeta<'_>) -> bool {
        match self.resource_type {
            Some(key) => key == request.resource_type,
            None => true,
        }
    }

    fn create(
        &self,
        request: &RequestMeta<'_>,
        permissions: &[Permission],
    ) -> Box<dyn AuthorizationSpecification> {
        let matching: Vec<Permission> = permissions
            .iter()
            .filter(|p| p.matches(request.resource_type, request.action))
            .cloned()
            .collect();
        Box::new(ConditionSpecification::new(
            matching,
            Arc::clone(&self.expressions),
        ))
    }
}
