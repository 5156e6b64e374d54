use std::sync::Arc;

use async_trait::async_trait;
use rolegate_core::{AppResult, UserId};
use rolegate_domain::ADMIN_ROLE_SLUG;
use tracing::debug;

use crate::rbac_ports::{AuthorizationRepository, RoleGrant};

/// Answers whether a user holds a permission key.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Returns whether any live role of the user grants `permission_key`.
    async fn has_permission(&self, user_id: UserId, permission_key: &str) -> AppResult<bool>;
}

/// Permission evaluator backed by stored role grants.
///
/// A live assignment of the `admin` role grants every key, including keys the
/// catalog does not know.
#[derive(Clone)]
pub struct PermissionService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl PermissionService {
    /// Creates a new permission evaluator.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PermissionChecker for PermissionService {
    async fn has_permission(&self, user_id: UserId, permission_key: &str) -> AppResult<bool> {
        let grants = self
            .repository
            .list_role_grants(user_id, permission_key)
            .await?;

        let granted = grants.iter().any(role_grants_permission);
        debug!(user_id = %user_id, permission = permission_key, granted, "permission evaluated");

        Ok(granted)
    }
}

fn role_grants_permission(grant: &RoleGrant) -> bool {
    grant.slug == ADMIN_ROLE_SLUG || grant.grants_permission
}
