//! Authorization service facade.

use std::sync::Arc;

use tracing::{debug, trace};

use resauth_core::{AuthzError, AuthzResult};

use crate::context::AuthorizationContext;
use crate::mapper::{EntityMapper, MapperRegistry};
use crate::permission::Permission;
use crate::request::AuthorizationRequest;
use crate::resource::Resource;
use crate::specification::{AuthorizationSpecification, AuthorizationSpecificationFactory};

/// Permission lookup, typically backed by the permission store and cacheable
/// by the caller. `role_keys` is the principal's role set; the result is the
/// union of permissions granted to those roles.
pub trait PermissionSource: Send + Sync {
    fn find_permissions(&self, role_keys: &[String]) -> AuthzResult<Vec<Permission>>;
}

/// Supplies the role keys of the principal in effect for the current call.
pub trait RoleSupplier: Send + Sync {
    fn current_roles(&self) -> Vec<String>;
}

/// Facade over permission lookup, factory selection and mapper resolution.
///
/// Holds read-only wiring; per-request state lives in the specifications it
/// hands out.
pub struct AuthorizationService {
    permissions: Arc<dyn PermissionSource>,
    roles: Arc<dyn RoleSupplier>,
    factories: Vec<Box<dyn AuthorizationSpecificationFactory>>,
    mappers: MapperRegistry,
}

impl AuthorizationService {
    pub fn new(permissions: Arc<dyn PermissionSource>, roles: Arc<dyn RoleSupplier>) -> Self {
        Self {
            permissions,
            roles,
            factories: Vec::new(),
            mappers: MapperRegistry::new(),
        }
    }

    /// Append a factory to the registry. Factories are tried in registration
    /// order and the first `can_create` match wins, so order matters and is
    /// part of the application's configuration.
    pub fn register_factory(&mut self, factory: Box<dyn AuthorizationSpecificationFactory>) {
        self.factories.push(factory);
    }

    pub fn register_mapper<F: 'static, T: 'static>(&mut self, mapper: Arc<dyn EntityMapper<F, T>>) {
        self.mappers.register(mapper);
    }

    // ────────────────────────────────────────────────────────────────────
    // Enforcement
    // ────────────────────────────────────────────────────────────────────

    /// Enforce a decision, loading the principal's permissions.
    ///
    /// With an entity: the entity itself must be authorized. Without one:
    /// succeeds iff a factory handles the type and at least one permission
    /// record exists for the action — an "is this operation ever reachable"
    /// check. A `deny` request fails unless the bypass context is active; an
    /// active bypass short-circuits every check to success.
    pub fn require_permission<R: Resource>(
        &self,
        request: &AuthorizationRequest<R>,
        entity: Option<&R>,
    ) -> AuthzResult<()> {
        // A bypassed call must not depend on the permission lookup I/O.
        let permissions = if AuthorizationContext::is_ignoring_authorization() {
            Vec::new()
        } else {
            self.load_permissions()?
        };
        self.require_permission_with(request, entity, &permissions)
    }

    /// Enforce a decision against an already-loaded permission snapshot.
    pub fn require_permission_with<R: Resource>(
        &self,
        request: &AuthorizationRequest<R>,
        entity: Option<&R>,
        permissions: &[Permission],
    ) -> AuthzResult<()> {
        if AuthorizationContext::is_ignoring_authorization() {
            trace!(
                resource_type = R::KEY,
                action = request.action().key(),
                "authorization bypassed"
            );
            return Ok(());
        }

        if request.action().is_deny() {
            debug!(resource_type = R::KEY, "deny action requested outside bypass");
            return Err(AuthzError::Unauthorized);
        }

        let specification = self.build_specification(request, permissions)?;
        let authorized = match entity {
            Some(entity) => specification.is_authorized(&entity.snapshot()?),
            None => permissions
                .iter()
                .any(|p| p.matches(R::KEY, request.action().key())),
        };

        if authorized {
            Ok(())
        } else {
            debug!(
                resource_type = R::KEY,
                action = request.action().key(),
                "authorization denied"
            );
            Err(AuthzError::Unauthorized)
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Specifications & mappers
    // ────────────────────────────────────────────────────────────────────

    /// Resolve the specification for a request, loading the principal's
    /// permissions. Typically used to scope a list query via
    /// [`AuthorizationSpecification::filter`].
    pub fn authorization_specification<R: Resource>(
        &self,
        request: &AuthorizationRequest<R>,
    ) -> AuthzResult<Box<dyn AuthorizationSpecification>> {
        let permissions = self.load_permissions()?;
        self.build_specification(request, &permissions)
    }

    /// Resolve the specification against an already-loaded permission
    /// snapshot.
    pub fn authorization_specification_with<R: Resource>(
        &self,
        request: &AuthorizationRequest<R>,
        permissions: &[Permission],
    ) -> AuthzResult<Box<dyn AuthorizationSpecification>> {
        self.build_specification(request, permissions)
    }

    /// Resolve the mapper cascading decisions from `F` entities onto related
    /// `T` entities.
    pub fn mapper<F: 'static, T: 'static>(&self) -> AuthzResult<Arc<dyn EntityMapper<F, T>>> {
        self.mappers.get::<F, T>()
    }

    fn load_permissions(&self) -> AuthzResult<Vec<Permission>> {
        let roles = self.roles.current_roles();
        self.permissions.find_permissions(&roles)
    }

    fn build_specification<R: Resource>(
        &self,
        request: &AuthorizationRequest<R>,
        permissions: &[Permission],
    ) -> AuthzResult<Box<dyn AuthorizationSpecification>> {
        let meta = request.meta();
        for (position, factory) in self.factories.iter().enumerate() {
            if factory.can_create(&meta) {
                trace!(
                    resource_type = meta.resource_type,
                    action = meta.action,
                    position,
                    "specification factory selected"
                );
                return Ok(factory.create(&meta, permissions));
            }
        }
        Err(AuthzError::resource_not_supported(format!(
            "no specification factory for resource type '{}'",
            meta.resource_type
        )))
    }
}
