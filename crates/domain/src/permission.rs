use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Fixed catalog of permission keys enforced by policy checks.
///
/// The catalog is the single source of truth for valid keys; every write that
/// accepts keys from a caller validates against it before touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    /// Allows viewing places.
    PlacesRead,
    /// Allows creating and editing any place.
    PlacesWrite,
    /// Allows editing only places owned by the caller.
    PlacesOwn,
    /// Allows deleting places.
    PlacesDelete,
    /// Allows viewing place types.
    PlaceTypesRead,
    /// Allows creating and editing place types.
    PlaceTypesWrite,
    /// Allows viewing plans.
    PlansRead,
    /// Allows creating and editing plans.
    PlansWrite,
    /// Allows deleting plans.
    PlansDelete,
    /// Allows viewing user profiles.
    UsersRead,
    /// Allows editing user profiles.
    UsersWrite,
    /// Allows managing roles and role assignments.
    RolesManage,
}

/// Catalog entry projection for permission listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionDescriptor {
    /// Full `resource:action` key.
    pub key: &'static str,
    /// Resource half of the key.
    pub resource: &'static str,
    /// Action half of the key.
    pub action: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

impl Permission {
    /// Returns the stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlacesRead => "places:read",
            Self::PlacesWrite => "places:write",
            Self::PlacesOwn => "places:own",
            Self::PlacesDelete => "places:delete",
            Self::PlaceTypesRead => "place_types:read",
            Self::PlaceTypesWrite => "place_types:write",
            Self::PlansRead => "plans:read",
            Self::PlansWrite => "plans:write",
            Self::PlansDelete => "plans:delete",
            Self::UsersRead => "users:read",
            Self::UsersWrite => "users:write",
            Self::RolesManage => "roles:manage",
        }
    }

    /// Returns the resource half of the key.
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.split().0
    }

    /// Returns the action half of the key.
    #[must_use]
    pub fn action(&self) -> &'static str {
        self.split().1
    }

    /// Returns the human-readable description shown in catalog listings.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::PlacesRead => "View places",
            Self::PlacesWrite => "Create / edit places",
            Self::PlacesOwn => "Edit only places you own",
            Self::PlacesDelete => "Delete places",
            Self::PlaceTypesRead => "View place types",
            Self::PlaceTypesWrite => "Create / edit place types",
            Self::PlansRead => "View plans",
            Self::PlansWrite => "Create / edit plans",
            Self::PlansDelete => "Delete plans",
            Self::UsersRead => "View user profiles",
            Self::UsersWrite => "Edit user profiles",
            Self::RolesManage => "Create, update, delete roles and assign roles to users",
        }
    }

    /// Every catalog member in catalog order.
    pub const ALL: &'static [Self] = &[
        Self::PlacesRead,
        Self::PlacesWrite,
        Self::PlacesOwn,
        Self::PlacesDelete,
        Self::PlaceTypesRead,
        Self::PlaceTypesWrite,
        Self::PlansRead,
        Self::PlansWrite,
        Self::PlansDelete,
        Self::UsersRead,
        Self::UsersWrite,
        Self::RolesManage,
    ];

    /// Returns all known permissions in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        Self::ALL
    }

    /// Returns every valid key.
    #[must_use]
    pub fn all_keys() -> BTreeSet<&'static str> {
        Self::all().iter().map(Self::as_str).collect()
    }

    /// Returns catalog entries in catalog order.
    #[must_use]
    pub fn descriptors() -> Vec<PermissionDescriptor> {
        Self::all()
            .iter()
            .map(|permission| PermissionDescriptor {
                key: permission.as_str(),
                resource: permission.resource(),
                action: permission.action(),
                description: permission.description(),
            })
            .collect()
    }

    /// Returns whether `key` is a catalog member.
    #[must_use]
    pub fn is_valid_key(key: &str) -> bool {
        Self::from_str(key).is_ok()
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }

    fn split(&self) -> (&'static str, &'static str) {
        self.as_str().split_once(':').unwrap_or((self.as_str(), ""))
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::PermissionInvalid(format!("unknown permission '{value}'")))
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.as_str().to_owned()
    }
}
