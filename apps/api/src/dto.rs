mod assignments;
mod audit;
mod common;
mod roles;

pub use assignments::{AssignRoleRequest, RoleAssignmentResponse, UserRoleResponse};
pub use audit::{
    AuditRoleResponse, AuditUserResponse, RoleAuditEntryResponse, RoleAuditListResponse,
    RoleAuditQueryParams,
};
pub use common::{DataResponse, HealthResponse, PageMetaResponse, PageQuery};
pub use roles::{
    CreateRoleRequest, PermissionResponse, RoleListResponse, RoleResponse, UpdateRoleRequest,
};

#[cfg(test)]
mod tests {
    use super::{
        AssignRoleRequest, AuditRoleResponse, AuditUserResponse, CreateRoleRequest,
        HealthResponse, PageMetaResponse, PermissionResponse, RoleAssignmentResponse,
        RoleAuditEntryResponse, RoleAuditListResponse, RoleListResponse, RoleResponse,
        UpdateRoleRequest, UserRoleResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        CreateRoleRequest::export(&config)?;
        UpdateRoleRequest::export(&config)?;
        AssignRoleRequest::export(&config)?;
        PermissionResponse::export(&config)?;
        RoleResponse::export(&config)?;
        RoleListResponse::export(&config)?;
        RoleAssignmentResponse::export(&config)?;
        UserRoleResponse::export(&config)?;
        AuditUserResponse::export(&config)?;
        AuditRoleResponse::export(&config)?;
        RoleAuditEntryResponse::export(&config)?;
        RoleAuditListResponse::export(&config)?;
        PageMetaResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;

        Ok(())
    }
}
