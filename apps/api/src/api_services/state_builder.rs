use std::sync::Arc;

use axum::http::HeaderName;
use rolegate_infrastructure::{
    PostgresAuthorizationRepository, PostgresPlaceOwnerRepository, PostgresRoleAuditLogRepository,
    PostgresRoleRepository, PostgresUserDirectory, PostgresUserRoleRepository,
};
use sqlx::PgPool;

use crate::state::{AppState, RbacPorts};

pub fn build_app_state(pool: PgPool, identity_header: HeaderName) -> AppState {
    let ports = RbacPorts {
        roles: Arc::new(PostgresRoleRepository::new(pool.clone())),
        authorization: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        resource_owners: Arc::new(PostgresPlaceOwnerRepository::new(pool.clone())),
        users: Arc::new(PostgresUserDirectory::new(pool.clone())),
        assignments: Arc::new(PostgresUserRoleRepository::new(pool.clone())),
        audit: Arc::new(PostgresRoleAuditLogRepository::new(pool)),
    };

    AppState::new(ports, identity_header)
}
