//! Permission records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resauth_core::Condition;

use crate::action::DENY_KEY;
use crate::role::Role;

/// Unique identifier of a deployed permission record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(Uuid);

impl PermissionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Grant of an action on a resource type to a role, gated by a condition
/// tree.
///
/// Permissions are produced by an external deployment process and are
/// read-only here: the fields are private and there are no mutators, so a
/// condition tree cannot change after construction. Multiple permissions may
/// exist for the same `(role, resource_type)` with different actions or
/// conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    role: Role,
    resource_type: String,
    action: String,
    conditions: Condition,
    deployed_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(
        id: PermissionId,
        role: Role,
        resource_type: impl Into<String>,
        action: impl Into<String>,
        conditions: Condition,
        deployed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            role,
            resource_type: resource_type.into(),
            action: action.into(),
            conditions,
            deployed_at,
        }
    }

    /// Convenience constructor for freshly deployed grants.
    pub fn grant(
        role: Role,
        resource_type: impl Into<String>,
        action: impl Into<String>,
        conditions: Condition,
    ) -> Self {
        Self::new(
            PermissionId::new(),
            role,
            resource_type,
            action,
            conditions,
            Utc::now(),
        )
    }

    pub fn id(&self) -> PermissionId {
        self.id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn conditions(&self) -> &Condition {
        &self.conditions
    }

    pub fn deployed_at(&self) -> DateTime<Utc> {
        self.deployed_at
    }

    /// Whether this record applies to a `(resource_type, action)` request.
    ///
    /// The `deny` sentinel never matches, by construction; requests for it
    /// can only be satisfied by an active bypass scope.
    pub fn matches(&self, resource_type: &str, action: &str) -> bool {
        action != DENY_KEY && self.resource_type == resource_type && self.action == action
    }

    /// Whether this record was granted to one of the given role keys.
    pub fn granted_to(&self, role_keys: &[String]) -> bool {
        role_keys.iter().any(|key| key == self.role.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resauth_core::Operator;
    use serde_json::json;

    fn view_permission() -> Permission {
        Permission::grant(
            Role::new("ROLE_USER"),
            "test-document",
            "view",
            Condition::field("document.name", Operator::In, json!(["loan", "gift"])),
        )
    }

    #[test]
    fn matches_on_resource_type_and_action() {
        let permission = view_permission();
        assert!(permission.matches("test-document", "view"));
        assert!(!permission.matches("test-document", "edit"));
        assert!(!permission.matches("other", "view"));
    }

    #[test]
    fn deny_never_matches_any_permission() {
        let permission = Permission::grant(
            Role::new("ROLE_USER"),
            "test-document",
            DENY_KEY,
            Condition::and(vec![]),
        );
        assert!(!permission.matches("test-document", DENY_KEY));
    }

    #[test]
    fn granted_to_checks_role_key_set() {
        let permission = view_permission();
        assert!(permission.granted_to(&["ROLE_ADMIN".into(), "ROLE_USER".into()]));
        assert!(!permission.granted_to(&["ROLE_ADMIN".into()]));
    }

    #[test]
    fn deployed_record_round_trips_through_json() {
        let permission = view_permission();
        let raw = serde_json::to_value(&permission).unwrap();
        let parsed: Permission = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed, permission);
    }
}
