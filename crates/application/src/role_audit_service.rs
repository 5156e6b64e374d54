use std::sync::Arc;

use rolegate_core::AppResult;

use crate::rbac_ports::{RoleAuditLogRepository, RoleAuditPage, RoleAuditQuery};

/// Read-side service over the role assignment audit trail.
#[derive(Clone)]
pub struct RoleAuditService {
    repository: Arc<dyn RoleAuditLogRepository>,
}

impl RoleAuditService {
    /// Creates a new audit query service.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleAuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Lists entries matching the query, newest first.
    pub async fn list_entries(&self, query: RoleAuditQuery) -> AppResult<RoleAuditPage> {
        self.repository.list_entries(query).await
    }
}
