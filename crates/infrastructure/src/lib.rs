//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_rbac_repository;
mod postgres_authorization_repository;
mod postgres_place_owner_repository;
mod postgres_role_audit_log_repository;
mod postgres_role_repository;
mod postgres_user_directory;
mod postgres_user_role_repository;

pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_place_owner_repository::PostgresPlaceOwnerRepository;
pub use postgres_role_audit_log_repository::PostgresRoleAuditLogRepository;
pub use postgres_role_repository::{PostgresRoleRepository, ensure_default_roles};
pub use postgres_user_directory::PostgresUserDirectory;
pub use postgres_user_role_repository::PostgresUserRoleRepository;
