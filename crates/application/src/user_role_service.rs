use std::sync::Arc;

use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::RoleId;
use tracing::info;

use crate::rbac_ports::{
    AssignedRole, GrantOutcome, RoleAssignmentOutcome, RoleChange, RoleRepository, UserDirectory,
    UserRoleRepository,
};

/// Application service granting and revoking roles with an audit trail.
#[derive(Clone)]
pub struct UserRoleService {
    users: Arc<dyn UserDirectory>,
    roles: Arc<dyn RoleRepository>,
    assignments: Arc<dyn UserRoleRepository>,
}

impl UserRoleService {
    /// Creates a new assignment service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        roles: Arc<dyn RoleRepository>,
        assignments: Arc<dyn UserRoleRepository>,
    ) -> Self {
        Self {
            users,
            roles,
            assignments,
        }
    }

    /// Grants a live role to an existing user.
    ///
    /// Re-assigning an already held role is a no-op reported with `created = false`
    /// and writes no audit entry.
    pub async fn assign_role(
        &self,
        actor_id: UserId,
        target_user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<RoleAssignmentOutcome> {
        self.ensure_user_exists(target_user_id).await?;

        let role = self
            .roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))?;

        let outcome = |assigned_at, created| RoleAssignmentOutcome {
            user_id: target_user_id,
            role_id,
            role_slug: role.slug.clone(),
            role_name: role.name.clone(),
            assigned_at,
            created,
        };

        if let Some(assigned_at) = self
            .assignments
            .find_assignment(target_user_id, role_id)
            .await?
        {
            return Ok(outcome(assigned_at, false));
        }

        let grant = self
            .assignments
            .grant_role(RoleChange {
                actor_id,
                target_user_id,
                role_id,
                role_slug: role.slug.clone(),
            })
            .await?;

        match grant {
            GrantOutcome::Created(assigned_at) => {
                info!(
                    actor_id = %actor_id,
                    user_id = %target_user_id,
                    role_id = %role_id,
                    slug = %role.slug,
                    "role assigned"
                );
                Ok(outcome(assigned_at, true))
            }
            GrantOutcome::Existing(assigned_at) => Ok(outcome(assigned_at, false)),
        }
    }

    /// Revokes a held role from a user.
    ///
    /// A missing assignment is reported before a missing or tombstoned role.
    pub async fn unassign_role(
        &self,
        actor_id: UserId,
        target_user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let not_assigned = || {
            AppError::AssignmentNotFound(format!(
                "user '{target_user_id}' does not hold role '{role_id}'"
            ))
        };

        if self
            .assignments
            .find_assignment(target_user_id, role_id)
            .await?
            .is_none()
        {
            return Err(not_assigned());
        }

        let role = self
            .roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))?;

        let removed = self
            .assignments
            .revoke_role(RoleChange {
                actor_id,
                target_user_id,
                role_id,
                role_slug: role.slug.clone(),
            })
            .await?;
        if !removed {
            return Err(not_assigned());
        }

        info!(
            actor_id = %actor_id,
            user_id = %target_user_id,
            role_id = %role_id,
            slug = %role.slug,
            "role unassigned"
        );
        Ok(())
    }

    /// Lists the live roles held by an existing user.
    pub async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<AssignedRole>> {
        self.ensure_user_exists(user_id).await?;
        self.assignments.list_roles_for_user(user_id).await
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> AppResult<()> {
        if self.users.user_exists(user_id).await? {
            return Ok(());
        }

        Err(AppError::UserNotFound(format!(
            "user '{user_id}' does not exist"
        )))
    }
}
