use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use rolegate_core::{AppError, AppResult, UserId, UserIdentity};
use rolegate_domain::RoleId;
use uuid::Uuid;

use crate::dto::{
    AssignRoleRequest, CreateRoleRequest, DataResponse, HealthResponse, PageQuery,
    PermissionResponse, RoleAssignmentResponse, RoleAuditListResponse, RoleAuditQueryParams,
    RoleListResponse, RoleResponse, UpdateRoleRequest, UserRoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub mod audit;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod user_roles;


fn parse_path_id(value: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| AppError::Validation(format!("invalid {field}")))
}

fn parse_role_id(value: &str) -> AppResult<RoleId> {
    parse_path_id(value, "role_id").map(RoleId::from_uuid)
}

fn parse_user_id(value: &str) -> AppResult<UserId> {
    parse_path_id(value, "user_id").map(UserId::from_uuid)
}
