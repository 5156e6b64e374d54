use chrono::{DateTime, Utc};
use rolegate_core::{PageRequest, UserId};
use rolegate_domain::{RoleAuditAction, RoleId};
use uuid::Uuid;

/// User reference on an audit entry, enriched with the directory name when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditUserRef {
    /// User identifier.
    pub user_id: UserId,
    /// Display name, absent when the user no longer resolves in the directory.
    pub name: Option<String>,
}

/// Role reference on an audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRoleRef {
    /// Role identifier.
    pub role_id: RoleId,
    /// Slug captured when the entry was written.
    pub slug: String,
    /// Current role name, absent once the role is tombstoned.
    pub name: Option<String>,
}

/// Enriched audit entry for administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAuditEntry {
    /// Stable entry identifier.
    pub entry_id: Uuid,
    /// Administrator who made the change.
    pub actor: AuditUserRef,
    /// Change kind.
    pub action: RoleAuditAction,
    /// User whose roles changed.
    pub target_user: AuditUserRef,
    /// Role that was granted or revoked.
    pub role: AuditRoleRef,
    /// Entry timestamp.
    pub created_at: DateTime<Utc>,
}

/// Filters for audit listing. Results are newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleAuditQuery {
    /// Normalized pagination.
    pub page: PageRequest,
    /// Restricts entries to one target user.
    pub target_user_id: Option<UserId>,
    /// Restricts entries to one role.
    pub role_id: Option<RoleId>,
    /// Restricts entries to one action.
    pub action: Option<RoleAuditAction>,
}

/// One page of audit entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAuditPage {
    /// Entries on the requested page.
    pub entries: Vec<RoleAuditEntry>,
    /// Number of entries matching the filters.
    pub total: u64,
}
