mod assignments;
mod audit;
mod repositories;
mod roles;

pub use assignments::{AssignedRole, GrantOutcome, RoleAssignmentOutcome, RoleChange, RoleGrant};
pub use audit::{AuditRoleRef, AuditUserRef, RoleAuditEntry, RoleAuditPage, RoleAuditQuery};
pub use repositories::{
    AuthorizationRepository, ResourceOwnerRepository, RoleAuditLogRepository, RoleRepository,
    UserDirectory, UserRoleRepository,
};
pub use roles::{CreateRoleInput, NewRole, RoleDefinition, RolePage, RoleUpdate, UpdateRoleInput};
