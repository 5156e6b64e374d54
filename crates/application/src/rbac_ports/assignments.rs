use chrono::{DateTime, Utc};
use rolegate_core::UserId;
use rolegate_domain::RoleId;

/// Result of an assignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentOutcome {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Role slug.
    pub role_slug: String,
    /// Role name.
    pub role_name: String,
    /// Timestamp of the stored assignment, old or new.
    pub assigned_at: DateTime<Utc>,
    /// False when the assignment already existed.
    pub created: bool,
}

/// Live role held by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRole {
    /// Role identifier.
    pub role_id: RoleId,
    /// Role slug.
    pub slug: String,
    /// Role name.
    pub name: String,
    /// System protection flag.
    pub is_system: bool,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Mutation payload for assignment writes and their audit rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    /// Administrator performing the change.
    pub actor_id: UserId,
    /// User gaining or losing the role.
    pub target_user_id: UserId,
    /// Role being granted or revoked.
    pub role_id: RoleId,
    /// Role slug captured at change time.
    pub role_slug: String,
}

/// Storage outcome of an assignment insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A new row was written together with its audit entry.
    Created(DateTime<Utc>),
    /// The pair was already assigned; nothing was written.
    Existing(DateTime<Utc>),
}

/// Per-role evidence used to answer a single permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    /// Live role held by the user.
    pub role_id: RoleId,
    /// Role slug, used for the superuser bypass.
    pub slug: String,
    /// Whether the role carries an explicit row for the requested key.
    pub grants_permission: bool,
}
