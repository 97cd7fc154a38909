//! Action keys, typed by their target resource.

use core::marker::PhantomData;
use std::borrow::Cow;

use crate::resource::Resource;

/// Reserved action key that never matches any deployed permission.
///
/// Requesting `deny` only succeeds inside an active bypass scope, which makes
/// it the standard gate for internal-only operations.
pub const DENY_KEY: &str = "deny";

/// Named operation being checked against a resource type (e.g. `view`,
/// `edit`, `delete`, `assign`).
///
/// The phantom parameter ties an action to the resource type it targets, so a
/// `view` action for one entity type cannot be used in a request for another.
pub struct Action<R> {
    key: Cow<'static, str>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Action<R> {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            _resource: PhantomData,
        }
    }

    /// The `deny` sentinel for this resource type.
    pub fn deny() -> Self {
        Self::new(DENY_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_deny(&self) -> bool {
        self.key == DENY_KEY
    }
}

impl<R> Clone for Action<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> core::fmt::Debug for Action<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Action").field(&self.key).finish()
    }
}

impl<R> PartialEq for Action<R> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<R> Eq for Action<R> {}

impl<R> core::fmt::Display for Action<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.key)
    }
}
