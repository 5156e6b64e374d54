use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use rolegate_application::rbac_ports::{AuthorizationRepository, RoleGrant};
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::RoleId;

/// PostgreSQL-backed repository for permission checks.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleGrantRow {
    role_id: Uuid,
    slug: String,
    grants_permission: bool,
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_role_grants(
        &self,
        user_id: UserId,
        permission_key: &str,
    ) -> AppResult<Vec<RoleGrant>> {
        let rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.slug,
                COUNT(grants.id) > 0 AS grants_permission
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
                AND roles.deleted_at IS NULL
            LEFT JOIN role_permissions AS grants
                ON grants.role_id = roles.id
                AND grants.permission = $2
            WHERE user_roles.user_id = $1
            GROUP BY roles.id, roles.slug
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(permission_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| RoleGrant {
                role_id: RoleId::from_uuid(row.role_id),
                slug: row.slug,
                grants_permission: row.grants_permission,
            })
            .collect())
    }
}
