use std::sync::Arc;

use axum::http::HeaderName;
use rolegate_application::rbac_ports::{
    AuthorizationRepository, ResourceOwnerRepository, RoleAuditLogRepository, RoleRepository,
    UserDirectory, UserRoleRepository,
};
use rolegate_application::{
    AuthorizationGuard, OwnershipService, PermissionService, RoleAuditService, RoleService,
    UserRoleService,
};

/// Storage adapters backing the RBAC services.
pub struct RbacPorts {
    pub roles: Arc<dyn RoleRepository>,
    pub authorization: Arc<dyn AuthorizationRepository>,
    pub resource_owners: Arc<dyn ResourceOwnerRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub assignments: Arc<dyn UserRoleRepository>,
    pub audit: Arc<dyn RoleAuditLogRepository>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleService,
    pub user_role_service: UserRoleService,
    pub role_audit_service: RoleAuditService,
    pub authorization_guard: AuthorizationGuard,
    pub identity_header: HeaderName,
}

impl AppState {
    pub fn new(ports: RbacPorts, identity_header: HeaderName) -> Self {
        let permission_service = Arc::new(PermissionService::new(ports.authorization));
        let ownership_service = Arc::new(OwnershipService::new(ports.resource_owners));

        Self {
            role_service: RoleService::new(ports.roles.clone()),
            user_role_service: UserRoleService::new(ports.users, ports.roles, ports.assignments),
            role_audit_service: RoleAuditService::new(ports.audit),
            authorization_guard: AuthorizationGuard::new(permission_service, ownership_service),
            identity_header,
        }
    }

    #[cfg(test)]
    pub fn in_memory(store: Arc<rolegate_infrastructure::InMemoryRbacRepository>) -> Self {
        let ports = RbacPorts {
            roles: store.clone(),
            authorization: store.clone(),
            resource_owners: store.clone(),
            users: store.clone(),
            assignments: store.clone(),
            audit: store,
        };

        Self::new(ports, HeaderName::from_static("x-user-id"))
    }
}
