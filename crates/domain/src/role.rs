//! Role identity and naming rules.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use rolegate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Permission;

/// Reserved slug of the superuser role.
///
/// A live assignment of the role carrying this slug implicitly grants every
/// permission key, including keys outside the catalog. The slug must never be
/// given to a non-privileged role.
pub const ADMIN_ROLE_SLUG: &str = "admin";

/// Maximum stored slug length.
pub const ROLE_SLUG_MAX_LENGTH: usize = 100;

/// Maximum stored role name length.
pub const ROLE_NAME_MAX_LENGTH: usize = 255;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Immutable business key of a role.
///
/// Lowercase ASCII letters, digits and hyphens; must not start or end with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleSlug(String);

impl RoleSlug {
    /// Creates a validated slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::Validation("role slug must not be empty".to_owned()));
        }

        if value.len() > ROLE_SLUG_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role slug must be at most {ROLE_SLUG_MAX_LENGTH} characters"
            )));
        }

        let allowed = value
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-');
        if !allowed || value.starts_with('-') || value.ends_with('-') {
            return Err(AppError::Validation(format!(
                "role slug '{value}' must be lowercase alphanumeric with inner hyphens only"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the reserved superuser slug.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE_SLUG
    }
}

impl Display for RoleSlug {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validates and trims a human-readable role name.
pub fn validate_role_name(value: &str) -> AppResult<NonEmptyString> {
    let trimmed = value.trim();
    if trimmed.chars().count() > ROLE_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "role name must be at most {ROLE_NAME_MAX_LENGTH} characters"
        )));
    }

    NonEmptyString::new(trimmed)
        .map_err(|_| AppError::Validation("role name must not be empty".to_owned()))
}

/// Rejects a system role permission update that would drop existing grants.
///
/// System roles may gain permissions but never lose one.
pub fn ensure_system_grants_retained(
    slug: &str,
    current: &BTreeSet<Permission>,
    requested: &BTreeSet<Permission>,
) -> AppResult<()> {
    let dropped: Vec<&str> = current
        .difference(requested)
        .map(Permission::as_str)
        .collect();
    if dropped.is_empty() {
        return Ok(());
    }

    Err(AppError::SystemRoleProtected(format!(
        "system role '{slug}' cannot lose permissions: {}",
        dropped.join(", ")
    )))
}

/// Bootstrap definition for a role seeded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRole {
    /// Role slug.
    pub slug: &'static str,
    /// Role name.
    pub name: &'static str,
    /// Whether the role is system-protected.
    pub is_system: bool,
    /// Baseline grants ensured for the role.
    pub permissions: &'static [Permission],
}

/// Returns the default roles seeded at bootstrap.
#[must_use]
pub fn default_roles() -> &'static [DefaultRole] {
    const DEFAULTS: &[DefaultRole] = &[
        DefaultRole {
            slug: ADMIN_ROLE_SLUG,
            name: "Administrator",
            is_system: true,
            permissions: Permission::ALL,
        },
        DefaultRole {
            slug: "editor",
            name: "Editor",
            is_system: false,
            permissions: &[
                Permission::PlacesRead,
                Permission::PlacesWrite,
                Permission::PlaceTypesRead,
                Permission::PlaceTypesWrite,
                Permission::PlansRead,
                Permission::PlansWrite,
                Permission::UsersRead,
            ],
        },
        DefaultRole {
            slug: "client",
            name: "Client",
            is_system: false,
            permissions: &[
                Permission::PlacesRead,
                Permission::PlaceTypesRead,
                Permission::PlansRead,
                Permission::PlansWrite,
                Permission::PlansDelete,
            ],
        },
        DefaultRole {
            slug: "owner",
            name: "Owner",
            is_system: false,
            permissions: &[
                Permission::PlacesRead,
                Permission::PlacesOwn,
                Permission::PlaceTypesRead,
            ],
        },
    ];

    DEFAULTS
}
