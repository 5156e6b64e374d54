use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use rolegate_core::{AppResult, PageRequest, UserId};
use rolegate_domain::RoleId;

use super::assignments::{AssignedRole, GrantOutcome, RoleChange, RoleGrant};
use super::audit::{RoleAuditPage, RoleAuditQuery};
use super::roles::{NewRole, RoleDefinition, RolePage, RoleUpdate};

/// Repository port for role definitions and their grants.
///
/// Every read ignores tombstoned roles.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds a live role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>>;

    /// Finds the live role holding a slug.
    async fn find_role_id_by_slug(&self, slug: &str) -> AppResult<Option<RoleId>>;

    /// Finds the live role holding a display name.
    async fn find_role_id_by_name(&self, name: &str) -> AppResult<Option<RoleId>>;

    /// Lists live roles ordered by creation time.
    async fn list_roles(&self, page: PageRequest) -> AppResult<RolePage>;

    /// Stores a role and its grants atomically.
    ///
    /// Slug and name races surface as the matching conflict error.
    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition>;

    /// Applies a validated update atomically and bumps `updated_at`.
    async fn update_role(&self, role_id: RoleId, update: RoleUpdate) -> AppResult<RoleDefinition>;

    /// Tombstones a live non-system role. Grants and assignments are kept.
    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()>;
}

/// Repository port backing permission evaluation.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists the user's live roles with whether each grants `permission_key`.
    async fn list_role_grants(
        &self,
        user_id: UserId,
        permission_key: &str,
    ) -> AppResult<Vec<RoleGrant>>;
}

/// Port resolving resource ownership for one resource kind.
#[async_trait]
pub trait ResourceOwnerRepository: Send + Sync {
    /// Returns the recorded owner, or `None` when the resource or its owner is missing.
    async fn find_owner(&self, resource_id: Uuid) -> AppResult<Option<UserId>>;
}

/// Read-only view of the external user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns whether the user exists.
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;
}

/// Repository port for user-role assignments.
///
/// Writes record their audit entry in the same transaction as the assignment row.
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Returns the assignment timestamp when the pair is assigned.
    async fn find_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<Option<DateTime<Utc>>>;

    /// Inserts the assignment and an `assign` audit entry unless the pair already exists.
    async fn grant_role(&self, change: RoleChange) -> AppResult<GrantOutcome>;

    /// Deletes the assignment and records a `remove` audit entry.
    ///
    /// Returns `false` when no row was deleted.
    async fn revoke_role(&self, change: RoleChange) -> AppResult<bool>;

    /// Lists the user's assignments to live roles, oldest first.
    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<AssignedRole>>;
}

/// Read port for the role audit trail.
#[async_trait]
pub trait RoleAuditLogRepository: Send + Sync {
    /// Lists enriched entries matching the query, newest first.
    async fn list_entries(&self, query: RoleAuditQuery) -> AppResult<RoleAuditPage>;
}
