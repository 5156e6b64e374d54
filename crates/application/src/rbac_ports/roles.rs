use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rolegate_core::NonEmptyString;
use rolegate_domain::{Permission, RoleId, RoleSlug};

/// Live role returned to callers with its effective grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Immutable business key.
    pub slug: String,
    /// Human-readable name, unique among live roles.
    pub name: String,
    /// Indicates a system-protected role.
    pub is_system: bool,
    /// Explicit grants in catalog order.
    pub permissions: Vec<Permission>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RoleDefinition {
    /// Returns the explicit grants as a set.
    #[must_use]
    pub fn permission_set(&self) -> BTreeSet<Permission> {
        self.permissions.iter().copied().collect()
    }
}

/// One page of live roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePage {
    /// Roles on the requested page.
    pub roles: Vec<RoleDefinition>,
    /// Number of live roles across all pages.
    pub total: u64,
}

/// Raw caller input for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Requested slug.
    pub slug: String,
    /// Requested display name.
    pub name: String,
    /// Requested permission keys, validated against the catalog.
    pub permissions: Vec<String>,
}

/// Raw caller input for updating a role. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement permission keys.
    pub permissions: Option<Vec<String>>,
}

/// Validated role handed to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Validated slug.
    pub slug: RoleSlug,
    /// Validated display name.
    pub name: NonEmptyString,
    /// System protection flag.
    pub is_system: bool,
    /// Deduplicated grants.
    pub permissions: BTreeSet<Permission>,
}

/// Validated partial update handed to storage.
///
/// Storage applies both halves in one transaction and re-checks the system role
/// rule against the rows it locks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleUpdate {
    /// Replacement display name.
    pub name: Option<NonEmptyString>,
    /// Replacement grant set.
    pub permissions: Option<BTreeSet<Permission>>,
}

impl RoleUpdate {
    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.permissions.is_none()
    }
}
