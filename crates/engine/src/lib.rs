//! `resauth-engine` — resource-based authorization engine.
//!
//! Ties the condition interpreter from `resauth-core` to permissions, the
//! execution-scoped bypass context, specification factories and the service
//! facade. Persistence of permission records and the surrounding web/workflow
//! plumbing are intentionally outside this crate.

pub mod action;
pub mod context;
pub mod mapper;
pub mod permission;
pub mod request;
pub mod resource;
pub mod role;
pub mod service;
pub mod specification;

pub use action::{Action, DENY_KEY};
pub use context::AuthorizationContext;
pub use mapper::{EntityMapper, MapperRegistry};
pub use permission::{Permission, PermissionId};
pub use request::{AuthorizationRequest, RequestMeta};
pub use resource::Resource;
pub use role::Role;
pub use service::{AuthorizationService, PermissionSource, RoleSupplier};
pub use specification::{
    AuthorizationSpecification, AuthorizationSpecificationFactory, ConditionSpecification,
    ConditionSpecificationFactory,
};
