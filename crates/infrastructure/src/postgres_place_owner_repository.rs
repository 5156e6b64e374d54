use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_application::rbac_ports::ResourceOwnerRepository;
use rolegate_core::{AppError, AppResult, UserId};

/// PostgreSQL-backed owner lookup for places.
#[derive(Clone)]
pub struct PostgresPlaceOwnerRepository {
    pool: PgPool,
}

impl PostgresPlaceOwnerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceOwnerRepository for PostgresPlaceOwnerRepository {
    async fn find_owner(&self, resource_id: Uuid) -> AppResult<Option<UserId>> {
        let owner = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT owner_id
            FROM places
            WHERE id = $1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve place owner: {error}")))?;

        Ok(owner.flatten().map(UserId::from_uuid))
    }
}
