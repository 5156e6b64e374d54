use rolegate_application::rbac_ports::{AssignedRole, RoleAssignmentOutcome};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::format_timestamp;

/// Incoming payload for role assignment.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub role_id: String,
}

/// API representation of an assignment result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub user_id: String,
    pub role_id: String,
    pub role_slug: String,
    pub role_name: String,
    pub assigned_at: String,
}

impl From<RoleAssignmentOutcome> for RoleAssignmentResponse {
    fn from(value: RoleAssignmentOutcome) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            role_id: value.role_id.to_string(),
            role_slug: value.role_slug,
            role_name: value.role_name,
            assigned_at: format_timestamp(value.assigned_at),
        }
    }
}

/// API representation of a role held by a user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-role-response.ts"
)]
pub struct UserRoleResponse {
    pub role_id: String,
    pub slug: String,
    pub name: String,
    pub is_system: bool,
    pub assigned_at: String,
}

impl From<AssignedRole> for UserRoleResponse {
    fn from(value: AssignedRole) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            slug: value.slug,
            name: value.name,
            is_system: value.is_system,
            assigned_at: format_timestamp(value.assigned_at),
        }
    }
}
