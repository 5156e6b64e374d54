//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod permission;
mod role;

pub use audit::RoleAuditAction;
pub use permission::{Permission, PermissionDescriptor};
pub use role::{
    ADMIN_ROLE_SLUG, DefaultRole, ROLE_NAME_MAX_LENGTH, ROLE_SLUG_MAX_LENGTH, RoleId, RoleSlug,
    default_roles, ensure_system_grants_retained, validate_role_name,
};
