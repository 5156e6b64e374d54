use rolegate_application::rbac_ports::{
    CreateRoleInput, RoleDefinition, RolePage, UpdateRoleInput,
};
use rolegate_core::PageRequest;
use rolegate_domain::PermissionDescriptor;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::{PageMetaResponse, format_timestamp};

/// Incoming payload for role creation.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub slug: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            slug: value.slug,
            name: value.name,
            permissions: value.permissions,
        }
    }
}

/// Incoming payload for role updates. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub permissions: Option<Vec<String>>,
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            name: value.name,
            permissions: value.permissions,
        }
    }
}

/// API representation of a catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub key: String,
    pub resource: String,
    pub action: String,
    pub description: String,
}

impl From<PermissionDescriptor> for PermissionResponse {
    fn from(value: PermissionDescriptor) -> Self {
        Self {
            key: value.key.to_owned(),
            resource: value.resource.to_owned(),
            action: value.action.to_owned(),
            description: value.description.to_owned(),
        }
    }
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub is_system: bool,
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            id: value.role_id.to_string(),
            slug: value.slug,
            name: value.name,
            is_system: value.is_system,
            permissions: value
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            created_at: format_timestamp(value.created_at),
            updated_at: format_timestamp(value.updated_at),
        }
    }
}

/// One page of roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-list-response.ts"
)]
pub struct RoleListResponse {
    pub data: Vec<RoleResponse>,
    pub meta: PageMetaResponse,
}

impl RoleListResponse {
    pub fn new(page: PageRequest, roles: RolePage) -> Self {
        Self {
            data: roles.roles.into_iter().map(RoleResponse::from).collect(),
            meta: PageMetaResponse::new(page, roles.total),
        }
    }
}
