//! Authorization requests.

use std::collections::HashMap;

use crate::action::Action;
use crate::resource::Resource;

/// What is being checked — a resource type plus an action, optionally
/// narrowed by resource-scoping parameters — independent of *who* is asking.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequest<R: Resource> {
    action: Action<R>,
    resources: Option<HashMap<String, Vec<String>>>,
}

impl<R: Resource> AuthorizationRequest<R> {
    pub fn new(action: Action<R>) -> Self {
        Self {
            action,
            resources: None,
        }
    }

    /// Attach resource-scoping parameters (e.g. ids of parent entities) that
    /// factories may use to narrow `can_create`.
    pub fn with_resources(mut self, resources: HashMap<String, Vec<String>>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn action(&self) -> &Action<R> {
        &self.action
    }

    pub fn resources(&self) -> Option<&HashMap<String, Vec<String>>> {
        self.resources.as_ref()
    }

    /// Type-erased view handed to the factory registry.
    pub fn meta(&self) -> RequestMeta<'_> {
        RequestMeta {
            resource_type: R::KEY,
            action: self.action.key(),
            resources: self.resources.as_ref(),
        }
    }
}

/// Borrowed, type-erased view of a request at the registry boundary.
#[derive(Debug, Clone, Copy)]
pub struct RequestMeta<'a> {
    pub resource_type: &'a str,
    pub action: &'a str,
    pub resources: Option<&'a HashMap<String, Vec<String>>>,
}
