use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use rolegate_application::rbac_ports::{
    AuditRoleRef, AuditUserRef, RoleAuditEntry, RoleAuditLogRepository, RoleAuditPage,
    RoleAuditQuery,
};
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{RoleAuditAction, RoleId};

/// PostgreSQL-backed read model for the role audit trail.
#[derive(Clone)]
pub struct PostgresRoleAuditLogRepository {
    pool: PgPool,
}

impl PostgresRoleAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleAuditRow {
    entry_id: Uuid,
    actor_id: Uuid,
    actor_name: Option<String>,
    action: String,
    target_user_id: Uuid,
    target_name: Option<String>,
    role_id: Uuid,
    role_slug: String,
    role_name: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl RoleAuditLogRepository for PostgresRoleAuditLogRepository {
    async fn list_entries(&self, query: RoleAuditQuery) -> AppResult<RoleAuditPage> {
        let target_user_id = query.target_user_id.map(|user_id| user_id.as_uuid());
        let role_id = query.role_id.map(|role_id| role_id.as_uuid());
        let action = query.action.map(|action| action.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM role_audit_logs AS logs
            WHERE ($1::UUID IS NULL OR logs.target_user_id = $1)
                AND ($2::UUID IS NULL OR logs.role_id = $2)
                AND ($3::TEXT IS NULL OR logs.action = $3)
            "#,
        )
        .bind(target_user_id)
        .bind(role_id)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count role audit entries: {error}"))
        })?;

        let rows = sqlx::query_as::<_, RoleAuditRow>(
            r#"
            SELECT
                logs.id AS entry_id,
                logs.actor_id,
                actors.name AS actor_name,
                logs.action,
                logs.target_user_id,
                targets.name AS target_name,
                logs.role_id,
                logs.role_slug,
                roles.name AS role_name,
                logs.created_at
            FROM role_audit_logs AS logs
            LEFT JOIN users AS actors
                ON actors.id = logs.actor_id
                AND actors.deleted_at IS NULL
            LEFT JOIN users AS targets
                ON targets.id = logs.target_user_id
                AND targets.deleted_at IS NULL
            LEFT JOIN roles
                ON roles.id = logs.role_id
                AND roles.deleted_at IS NULL
            WHERE ($1::UUID IS NULL OR logs.target_user_id = $1)
                AND ($2::UUID IS NULL OR logs.role_id = $2)
                AND ($3::TEXT IS NULL OR logs.action = $3)
            ORDER BY logs.created_at DESC, logs.id DESC
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(target_user_id)
        .bind(role_id)
        .bind(action)
        .bind(i64::from(query.page.limit()))
        .bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role audit entries: {error}"))
        })?;

        let entries = rows
            .into_iter()
            .map(|row| {
                let action = RoleAuditAction::from_str(row.action.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid stored audit action '{}' for entry '{}': {error}",
                        row.action, row.entry_id
                    ))
                })?;

                Ok(RoleAuditEntry {
                    entry_id: row.entry_id,
                    actor: AuditUserRef {
                        user_id: UserId::from_uuid(row.actor_id),
                        name: row.actor_name,
                    },
                    action,
                    target_user: AuditUserRef {
                        user_id: UserId::from_uuid(row.target_user_id),
                        name: row.target_name,
                    },
                    role: AuditRoleRef {
                        role_id: RoleId::from_uuid(row.role_id),
                        slug: row.role_slug,
                        name: row.role_name,
                    },
                    created_at: row.created_at,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(RoleAuditPage {
            entries,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
