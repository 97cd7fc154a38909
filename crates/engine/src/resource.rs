//! Resource marker trait.

use serde_json::Value;

use resauth_core::{AuthzError, AuthzResult};

/// A domain entity type the engine can authorize.
///
/// `KEY` is the stable resource-type key that deployed permissions reference;
/// `Serialize` supplies the snapshot condition trees are evaluated against.
pub trait Resource: serde::Serialize {
    const KEY: &'static str;

    /// Entity snapshot used by the in-memory evaluator.
    fn snapshot(&self) -> AuthzResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| AuthzError::validation(format!("entity snapshot failed: {e}")))
    }
}
