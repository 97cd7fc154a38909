//! Role identifiers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Stable role key matched against the principal's role set.
///
/// Roles are opaque strings at this layer (e.g. `ROLE_USER`); assigning them
/// to principals is an external workflow. There is no inheritance between
/// roles: the applicable permissions are fully determined by the role keys in
/// effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
