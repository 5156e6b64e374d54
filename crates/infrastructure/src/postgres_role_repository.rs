use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use rolegate_application::rbac_ports::{
    NewRole, RoleDefinition, RolePage, RoleRepository, RoleUpdate,
};
use rolegate_core::{AppError, AppResult, PageRequest};
use rolegate_domain::{Permission, RoleId, ensure_system_grants_retained};

mod seed;

pub use seed::ensure_default_roles;

const LIVE_SLUG_INDEX: &str = "roles_live_slug_key";
const LIVE_NAME_INDEX: &str = "roles_live_name_key";

/// PostgreSQL-backed repository for role definitions.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
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
struct RoleRow {
    role_id: Uuid,
    slug: String,
    name: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    permission: Option<String>,
}

#[derive(Debug, FromRow)]
struct LockedRoleRow {
    slug: String,
    is_system: bool,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        fetch_live_role(&self.pool, role_id).await
    }

    async fn find_role_id_by_slug(&self, slug: &str) -> AppResult<Option<RoleId>> {
        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM roles
            WHERE slug = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role slug: {error}")))?;

        Ok(role_id.map(RoleId::from_uuid))
    }

    async fn find_role_id_by_name(&self, name: &str) -> AppResult<Option<RoleId>> {
        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM roles
            WHERE name = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role name: {error}")))?;

        Ok(role_id.map(RoleId::from_uuid))
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<RolePage> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count roles: {error}")))?;

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            WITH page AS (
                SELECT id
                FROM roles
                WHERE deleted_at IS NULL
                ORDER BY created_at, id
                LIMIT $1
                OFFSET $2
            )
            SELECT
                roles.id AS role_id,
                roles.slug,
                roles.name,
                roles.is_system,
                roles.created_at,
                roles.updated_at,
                grants.permission
            FROM roles
            INNER JOIN page
                ON page.id = roles.id
            LEFT JOIN role_permissions AS grants
                ON grants.role_id = roles.id
            ORDER BY roles.created_at, roles.id, grants.permission
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(RolePage {
            roles: aggregate_roles(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let mut transaction = self.begin().await?;
        let role_id = RoleId::new();

        sqlx::query(
            r#"
            INSERT INTO roles (id, slug, name, is_system)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(role.slug.as_str())
        .bind(role.name.as_str())
        .bind(role.is_system)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, role.slug.as_str(), role.name.as_str()))?;

        insert_grants(&mut transaction, role_id, &role.permissions).await?;

        let created = fetch_live_role(&mut *transaction, role_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("role '{role_id}' vanished on create")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(created)
    }

    async fn update_role(&self, role_id: RoleId, update: RoleUpdate) -> AppResult<RoleDefinition> {
        let mut transaction = self.begin().await?;

        let locked = sqlx::query_as::<_, LockedRoleRow>(
            r#"
            SELECT slug, is_system
            FROM roles
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock role: {error}")))?
        .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))?;

        if let Some(name) = &update.name {
            sqlx::query(
                r#"
                UPDATE roles
                SET name = $2
                WHERE id = $1
                "#,
            )
            .bind(role_id.as_uuid())
            .bind(name.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_role_conflict(error, locked.slug.as_str(), name.as_str()))?;
        }

        if let Some(permissions) = &update.permissions {
            if locked.is_system {
                let current = fetch_grants(&mut *transaction, role_id).await?;
                ensure_system_grants_retained(&locked.slug, &current, permissions)?;
            }

            sqlx::query(
                r#"
                DELETE FROM role_permissions
                WHERE role_id = $1
                "#,
            )
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear role grants: {error}"))
            })?;

            insert_grants(&mut transaction, role_id, permissions).await?;
        }

        sqlx::query(
            r#"
            UPDATE roles
            SET updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to touch role: {error}")))?;

        let updated = fetch_live_role(&mut *transaction, role_id)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(updated)
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1
                AND deleted_at IS NULL
                AND is_system = FALSE
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
        .rows_affected();

        if rows_affected > 0 {
            return Ok(());
        }

        match self.find_role(role_id).await? {
            Some(role) if role.is_system => Err(AppError::SystemRoleProtected(format!(
                "system role '{}' cannot be deleted",
                role.slug
            ))),
            _ => Err(AppError::RoleNotFound(format!(
                "role '{role_id}' does not exist"
            ))),
        }
    }
}

async fn fetch_live_role<'e, E>(executor: E, role_id: RoleId) -> AppResult<Option<RoleDefinition>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT
            roles.id AS role_id,
            roles.slug,
            roles.name,
            roles.is_system,
            roles.created_at,
            roles.updated_at,
            grants.permission
        FROM roles
        LEFT JOIN role_permissions AS grants
            ON grants.role_id = roles.id
        WHERE roles.id = $1 AND roles.deleted_at IS NULL
        ORDER BY grants.permission
        "#,
    )
    .bind(role_id.as_uuid())
    .fetch_all(executor)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load role: {error}")))?;

    Ok(aggregate_roles(rows)?.into_iter().next())
}

async fn fetch_grants<'e, E>(executor: E, role_id: RoleId) -> AppResult<BTreeSet<Permission>>
where
    E: Executor<'e, Database = Postgres>,
{
    let values = sqlx::query_scalar::<_, String>(
        r#"
        SELECT permission
        FROM role_permissions
        WHERE role_id = $1
        "#,
    )
    .bind(role_id.as_uuid())
    .fetch_all(executor)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

    values
        .iter()
        .map(|value| decode_permission(value, role_id.as_uuid()))
        .collect()
}

async fn insert_grants(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: RoleId,
    permissions: &BTreeSet<Permission>,
) -> AppResult<()> {
    for permission in permissions {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist role grants: {error}")))?;
    }

    Ok(())
}

fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<RoleDefinition>> {
    let mut positions: HashMap<Uuid, usize> = HashMap::new();
    let mut roles: Vec<RoleDefinition> = Vec::new();

    for row in rows {
        let position = *positions.entry(row.role_id).or_insert_with(|| {
            roles.push(RoleDefinition {
                role_id: RoleId::from_uuid(row.role_id),
                slug: row.slug.clone(),
                name: row.name.clone(),
                is_system: row.is_system,
                permissions: Vec::new(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
            roles.len() - 1
        });

        if let Some(value) = row.permission {
            let permission = decode_permission(value.as_str(), row.role_id)?;
            roles[position].permissions.push(permission);
        }
    }

    for role in &mut roles {
        role.permissions.sort();
    }

    Ok(roles)
}

fn decode_permission(value: &str, role_id: Uuid) -> AppResult<Permission> {
    Permission::from_str(value).map_err(|error| {
        AppError::Internal(format!(
            "invalid stored permission '{value}' for role '{role_id}': {error}"
        ))
    })
}

fn map_role_conflict(error: sqlx::Error, slug: &str, name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return match database_error.constraint() {
            Some(LIVE_SLUG_INDEX) => {
                AppError::RoleSlugConflict(format!("role with slug '{slug}' already exists"))
            }
            Some(LIVE_NAME_INDEX) => {
                AppError::RoleNameConflict(format!("role with name '{name}' already exists"))
            }
            _ => AppError::Conflict(format!("role '{slug}' conflicts with an existing role")),
        };
    }

    AppError::Internal(format!("failed to write role: {error}"))
}

#[cfg(test)]
mod tests;
