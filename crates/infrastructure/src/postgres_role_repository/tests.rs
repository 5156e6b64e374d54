use std::collections::BTreeSet;

use rolegate_application::rbac_ports::{NewRole, RoleRepository, RoleUpdate};
use rolegate_core::{AppError, NonEmptyString, PageRequest};
use rolegate_domain::{ADMIN_ROLE_SLUG, Permission, RoleSlug};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{PostgresRoleRepository, ensure_default_roles};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres role tests: {error}");
    }

    Some(pool)
}

fn unique_role(prefix: &str, permissions: &[Permission]) -> NewRole {
    let suffix = Uuid::new_v4().simple().to_string();
    NewRole {
        slug: RoleSlug::new(format!("{prefix}-{}", &suffix[..12])).unwrap_or_else(|_| unreachable!()),
        name: NonEmptyString::new(format!("{prefix} {suffix}")).unwrap_or_else(|_| unreachable!()),
        is_system: false,
        permissions: permissions.iter().copied().collect(),
    }
}

#[tokio::test]
async fn create_role_persists_grants_and_enforces_live_uniqueness() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);

    let input = unique_role("editor", &[Permission::PlacesWrite, Permission::PlacesRead]);
    let created = repository
        .create_role(input.clone())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        created.permissions,
        vec![Permission::PlacesRead, Permission::PlacesWrite]
    );

    let same_slug = repository.create_role(input.clone()).await;
    assert!(matches!(same_slug, Err(AppError::RoleSlugConflict(_))));

    let mut same_name = unique_role("other", &[Permission::PlacesRead]);
    same_name.name = input.name.clone();
    let same_name = repository.create_role(same_name).await;
    assert!(matches!(same_name, Err(AppError::RoleNameConflict(_))));

    assert!(repository.soft_delete_role(created.role_id).await.is_ok());
    assert!(matches!(repository.find_role(created.role_id).await, Ok(None)));

    let recreated = repository.create_role(input).await;
    assert!(matches!(recreated, Ok(role) if role.role_id != created.role_id));
}

#[tokio::test]
async fn update_role_replaces_grants_atomically() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let created = repository
        .create_role(unique_role("client", &[Permission::PlansRead]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = repository
        .update_role(
            created.role_id,
            RoleUpdate {
                name: None,
                permissions: Some(
                    [Permission::PlansWrite, Permission::PlansDelete]
                        .into_iter()
                        .collect(),
                ),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        updated.permissions,
        vec![Permission::PlansWrite, Permission::PlansDelete]
    );
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn seeded_admin_cannot_shrink_or_be_deleted() {
    let Some(pool) = test_pool().await else {
        return;
    };
    assert!(ensure_default_roles(&pool).await.is_ok());
    assert!(ensure_default_roles(&pool).await.is_ok());
    let repository = PostgresRoleRepository::new(pool);

    let admin_id = repository
        .find_role_id_by_slug(ADMIN_ROLE_SLUG)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());
    let before = repository
        .find_role(admin_id)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());
    assert!(before.is_system);

    let shrink = repository
        .update_role(
            admin_id,
            RoleUpdate {
                name: None,
                permissions: Some(BTreeSet::new()),
            },
        )
        .await;
    assert!(matches!(shrink, Err(AppError::SystemRoleProtected(_))));

    let after = repository
        .find_role(admin_id)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(after.permissions, before.permissions);

    assert!(matches!(
        repository.soft_delete_role(admin_id).await,
        Err(AppError::SystemRoleProtected(_))
    ));
}

#[tokio::test]
async fn list_roles_reports_live_total() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    repository
        .create_role(unique_role("lister", &[Permission::UsersRead]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let page = repository
        .list_roles(PageRequest::new(Some(1), Some(1)))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.roles.len(), 1);
    assert!(page.total >= 1);
}
