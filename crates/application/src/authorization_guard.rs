use std::sync::Arc;

use rolegate_core::{AppError, AppResult, UserId, UserIdentity};
use rolegate_domain::Permission;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{OwnershipChecker, PermissionChecker};

/// Request-boundary guard composing permission and ownership checks.
///
/// Denials surface as `Unauthorized` when no identity is present and as
/// `Forbidden` otherwise. Evaluator failures are never read as a grant.
#[derive(Clone)]
pub struct AuthorizationGuard {
    permissions: Arc<dyn PermissionChecker>,
    ownership: Arc<dyn OwnershipChecker>,
}

impl AuthorizationGuard {
    /// Creates a guard from a permission evaluator and an ownership resolver.
    #[must_use]
    pub fn new(
        permissions: Arc<dyn PermissionChecker>,
        ownership: Arc<dyn OwnershipChecker>,
    ) -> Self {
        Self {
            permissions,
            ownership,
        }
    }

    /// Requires the caller to hold `permission`.
    pub async fn require_permission(
        &self,
        identity: Option<&UserIdentity>,
        permission: Permission,
    ) -> AppResult<UserId> {
        let user_id = authenticated_user(identity)?;

        if self.check(user_id, permission).await? {
            return Ok(user_id);
        }

        warn!(user_id = %user_id, permission = %permission, "permission denied");
        Err(AppError::Forbidden(format!(
            "user '{user_id}' is missing permission '{permission}'"
        )))
    }

    /// Requires the caller to hold `full`, or to hold `own` and own the resource.
    ///
    /// Ownership is only resolved when `full` is missing and `own` is held.
    pub async fn require_ownership_or_permission(
        &self,
        identity: Option<&UserIdentity>,
        resource_id: Uuid,
        full: Permission,
        own: Permission,
    ) -> AppResult<UserId> {
        let user_id = authenticated_user(identity)?;

        if self.check(user_id, full).await? {
            return Ok(user_id);
        }

        if self.check(user_id, own).await? {
            let is_owner = self
                .ownership
                .is_owner(resource_id, user_id)
                .await
                .map_err(|source| {
                    error!(
                        user_id = %user_id,
                        resource_id = %resource_id,
                        %source,
                        "ownership check failed"
                    );
                    internal(source)
                })?;
            if is_owner {
                return Ok(user_id);
            }
        }

        warn!(
            user_id = %user_id,
            resource_id = %resource_id,
            full = %full,
            own = %own,
            "resource access denied"
        );
        Err(AppError::Forbidden(format!(
            "user '{user_id}' may not act on resource '{resource_id}'"
        )))
    }

    async fn check(&self, user_id: UserId, permission: Permission) -> AppResult<bool> {
        self.permissions
            .has_permission(user_id, permission.as_str())
            .await
            .map_err(|source| {
                error!(
                    user_id = %user_id,
                    permission = %permission,
                    %source,
                    "permission check failed"
                );
                internal(source)
            })
    }
}

fn authenticated_user(identity: Option<&UserIdentity>) -> AppResult<UserId> {
    identity
        .map(UserIdentity::user_id)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
}

fn internal(source: AppError) -> AppError {
    match source {
        AppError::Internal(message) => AppError::Internal(message),
        other => AppError::Internal(other.to_string()),
    }
}
