use async_trait::async_trait;
use sqlx::PgPool;

use rolegate_application::rbac_ports::UserDirectory;
use rolegate_core::{AppError, AppResult, UserId};

/// PostgreSQL-backed read view of the user directory.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory view with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM users
                WHERE id = $1 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user: {error}")))
    }
}
