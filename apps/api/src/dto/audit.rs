use std::str::FromStr;

use rolegate_application::rbac_ports::{
    AuditRoleRef, AuditUserRef, RoleAuditEntry, RoleAuditPage, RoleAuditQuery,
};
use rolegate_core::{AppError, AppResult, PageRequest, UserId};
use rolegate_domain::{RoleAuditAction, RoleId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::common::{PageMetaResponse, PageQuery, format_timestamp};

/// Raw audit listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct RoleAuditQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub user_id: Option<String>,
    pub role_id: Option<String>,
    pub action: Option<String>,
}

impl RoleAuditQueryParams {
    /// Validates filters. Empty values count as absent.
    pub fn into_query(self) -> AppResult<RoleAuditQuery> {
        let page = PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .page_request();

        let target_user_id = non_empty(self.user_id)
            .map(|value| parse_filter_id(&value, "user_id").map(UserId::from_uuid))
            .transpose()?;
        let role_id = non_empty(self.role_id)
            .map(|value| parse_filter_id(&value, "role_id").map(RoleId::from_uuid))
            .transpose()?;
        let action = non_empty(self.action)
            .map(|value| RoleAuditAction::from_str(&value))
            .transpose()?;

        Ok(RoleAuditQuery {
            page,
            target_user_id,
            role_id,
            action,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_filter_id(value: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| AppError::Validation(format!("invalid {field}")))
}

/// User reference on an audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-user-response.ts"
)]
pub struct AuditUserResponse {
    pub id: String,
    pub name: Option<String>,
}

impl From<AuditUserRef> for AuditUserResponse {
    fn from(value: AuditUserRef) -> Self {
        Self {
            id: value.user_id.to_string(),
            name: value.name,
        }
    }
}

/// Role reference on an audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-role-response.ts"
)]
pub struct AuditRoleResponse {
    pub id: String,
    pub slug: String,
    pub name: Option<String>,
}

impl From<AuditRoleRef> for AuditRoleResponse {
    fn from(value: AuditRoleRef) -> Self {
        Self {
            id: value.role_id.to_string(),
            slug: value.slug,
            name: value.name,
        }
    }
}

/// API representation of one audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-audit-entry-response.ts"
)]
pub struct RoleAuditEntryResponse {
    pub id: String,
    pub actor: AuditUserResponse,
    pub action: String,
    pub target_user: AuditUserResponse,
    pub role: AuditRoleResponse,
    pub created_at: String,
}

impl From<RoleAuditEntry> for RoleAuditEntryResponse {
    fn from(value: RoleAuditEntry) -> Self {
        Self {
            id: value.entry_id.to_string(),
            actor: AuditUserResponse::from(value.actor),
            action: value.action.as_str().to_owned(),
            target_user: AuditUserResponse::from(value.target_user),
            role: AuditRoleResponse::from(value.role),
            created_at: format_timestamp(value.created_at),
        }
    }
}

/// One page of audit entries.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-audit-list-response.ts"
)]
pub struct RoleAuditListResponse {
    pub data: Vec<RoleAuditEntryResponse>,
    pub meta: PageMetaResponse,
}

impl RoleAuditListResponse {
    pub fn new(page: PageRequest, entries: RoleAuditPage) -> Self {
        Self {
            data: entries
                .entries
                .into_iter()
                .map(RoleAuditEntryResponse::from)
                .collect(),
            meta: PageMetaResponse::new(page, entries.total),
        }
    }
}
