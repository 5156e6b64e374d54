use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{DefaultRole, RoleId, default_roles};

/// Ensures the default roles and their baseline grants exist.
///
/// Safe to run on every startup: missing roles and grants are added, nothing is
/// removed, and a role whose slug is already live keeps its current name.
pub async fn ensure_default_roles(pool: &PgPool) -> AppResult<()> {
    for role in default_roles() {
        ensure_default_role(pool, role).await?;
    }

    Ok(())
}

async fn ensure_default_role(pool: &PgPool, role: &DefaultRole) -> AppResult<()> {
    let mut transaction = pool
        .begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

    let created = sqlx::query(
        r#"
        INSERT INTO roles (id, slug, name, is_system)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(RoleId::new().as_uuid())
    .bind(role.slug)
    .bind(role.name)
    .bind(role.is_system)
    .execute(&mut *transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to seed role '{}': {error}", role.slug)))?
    .rows_affected()
        > 0;

    let Some(role_id) = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM roles
        WHERE slug = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(role.slug)
    .fetch_optional(&mut *transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to resolve seeded role: {error}")))?
    else {
        warn!(slug = role.slug, name = role.name, "default role name is taken, seeding skipped");
        return Ok(());
    };

    let mut granted = 0_u64;
    for permission in role.permissions {
        granted += sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission) DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to seed role grants: {error}"))
        })?
        .rows_affected();
    }

    transaction.commit().await.map_err(|error| {
        AppError::Internal(format!("failed to commit transaction: {error}"))
    })?;

    if created || granted > 0 {
        info!(slug = role.slug, created, granted, "default role seeded");
    }

    Ok(())
}
