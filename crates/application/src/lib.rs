//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_guard;
mod ownership_service;
mod permission_service;
/// Storage ports and data shapes for role-based access control.
pub mod rbac_ports;
mod role_audit_service;
mod role_service;
#[cfg(test)]
mod test_support;
mod user_role_service;

pub use authorization_guard::AuthorizationGuard;
pub use ownership_service::{OwnershipChecker, OwnershipService};
pub use permission_service::{PermissionChecker, PermissionService};
pub use role_audit_service::RoleAuditService;
pub use role_service::RoleService;
pub use user_role_service::UserRoleService;
