use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use rolegate_application::rbac_ports::{
    AssignedRole, GrantOutcome, RoleChange, UserRoleRepository,
};
use rolegate_core::{AppError, AppResult, UserId};
use rolegate_domain::{RoleAuditAction, RoleId};

/// PostgreSQL-backed repository for user-role assignments and their audit trail.
#[derive(Clone)]
pub struct PostgresUserRoleRepository {
    pool: PgPool,
}

impl PostgresUserRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct AssignedRoleRow {
    role_id: Uuid,
    slug: String,
    name: String,
    is_system: bool,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl UserRoleRepository for PostgresUserRoleRepository {
    async fn find_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT created_at
            FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve assignment: {error}")))
    }

    async fn grant_role(&self, change: RoleChange) -> AppResult<GrantOutcome> {
        let mut transaction = self.begin().await?;

        let inserted = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            RETURNING created_at
            "#,
        )
        .bind(change.target_user_id.as_uuid())
        .bind(change.role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| map_assignment_error(error, &change))?;

        let Some(assigned_at) = inserted else {
            let existing = sqlx::query_scalar::<_, DateTime<Utc>>(
                r#"
                SELECT created_at
                FROM user_roles
                WHERE user_id = $1 AND role_id = $2
                "#,
            )
            .bind(change.target_user_id.as_uuid())
            .bind(change.role_id.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to resolve assignment: {error}"))
            })?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "assignment of role '{}' to user '{}' changed concurrently",
                    change.role_id, change.target_user_id
                ))
            })?;

            debug!(
                user_id = %change.target_user_id,
                role_id = %change.role_id,
                "assignment already present"
            );
            return Ok(GrantOutcome::Existing(existing));
        };

        append_audit_entry(&mut transaction, &change, RoleAuditAction::Assign).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(GrantOutcome::Created(assigned_at))
    }

    async fn revoke_role(&self, change: RoleChange) -> AppResult<bool> {
        let mut transaction = self.begin().await?;

        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(change.target_user_id.as_uuid())
        .bind(change.role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove assignment: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Ok(false);
        }

        append_audit_entry(&mut transaction, &change, RoleAuditAction::Remove).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(true)
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<AssignedRole>> {
        let rows = sqlx::query_as::<_, AssignedRoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.slug,
                roles.name,
                roles.is_system,
                user_roles.created_at AS assigned_at
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
                AND roles.deleted_at IS NULL
            WHERE user_roles.user_id = $1
            ORDER BY user_roles.created_at, roles.slug
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| AssignedRole {
                role_id: RoleId::from_uuid(row.role_id),
                slug: row.slug,
                name: row.name,
                is_system: row.is_system,
                assigned_at: row.assigned_at,
            })
            .collect())
    }
}

async fn append_audit_entry(
    transaction: &mut Transaction<'_, Postgres>,
    change: &RoleChange,
    action: RoleAuditAction,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO role_audit_logs (id, actor_id, action, target_user_id, role_id, role_slug)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(change.actor_id.as_uuid())
    .bind(action.as_str())
    .bind(change.target_user_id.as_uuid())
    .bind(change.role_id.as_uuid())
    .bind(change.role_slug.as_str())
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to append role audit entry: {error}")))?;

    Ok(())
}

fn map_assignment_error(error: sqlx::Error, change: &RoleChange) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::UserNotFound(format!(
            "user '{}' does not exist",
            change.target_user_id
        ));
    }

    AppError::Internal(format!("failed to assign role: {error}"))
}
