use std::sync::Arc;

use rolegate_core::{AppError, PageRequest};
use rolegate_domain::{Permission, RoleId};

use crate::rbac_ports::{CreateRoleInput, UpdateRoleInput};
use crate::test_support::FakeRbacStore;

use super::RoleService;

fn create_input(slug: &str, name: &str, permissions: &[&str]) -> CreateRoleInput {
    CreateRoleInput {
        slug: slug.to_owned(),
        name: name.to_owned(),
        permissions: permissions.iter().map(|key| (*key).to_owned()).collect(),
    }
}

fn service_with_store() -> (RoleService, Arc<FakeRbacStore>) {
    let store = Arc::new(FakeRbacStore::default());
    (RoleService::new(store.clone()), store)
}

#[tokio::test]
async fn create_role_stores_deduplicated_grants() {
    let (service, _) = service_with_store();

    let role = service
        .create_role(create_input(
            "place-editor",
            "  Place Editor ",
            &["places:write", "places:read", "places:write"],
        ))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(role.slug, "place-editor");
    assert_eq!(role.name, "Place Editor");
    assert!(!role.is_system);
    assert_eq!(
        role.permissions,
        vec![Permission::PlacesRead, Permission::PlacesWrite]
    );
}

#[tokio::test]
async fn create_role_requires_all_fields() {
    let (service, _) = service_with_store();

    for input in [
        create_input("", "Name", &["places:read"]),
        create_input("slug", "   ", &["places:read"]),
        create_input("slug", "Name", &[]),
    ] {
        let result = service.create_role(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}

#[tokio::test]
async fn create_role_reports_bad_slug_before_unknown_permission() {
    let (service, _) = service_with_store();

    let result = service
        .create_role(create_input("Bad Slug", "Name", &["nope:nope"]))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = service
        .create_role(create_input("good", "Name", &["places:read", "nope:nope"]))
        .await;
    assert!(matches!(result, Err(AppError::PermissionInvalid(_))));
}

#[tokio::test]
async fn create_role_rejects_reserved_admin_slug() {
    let (service, _) = service_with_store();

    let result = service
        .create_role(create_input("admin", "Shadow Admin", &["places:read"]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_role_with_live_admin_slug_is_a_slug_conflict() {
    let (service, store) = service_with_store();
    store.add_role("admin", true, Permission::ALL).await;

    let result = service
        .create_role(create_input("admin", "Shadow Admin", &["places:read"]))
        .await;

    assert!(matches!(result, Err(AppError::RoleSlugConflict(_))));
}

#[tokio::test]
async fn create_role_reports_slug_conflict_before_name_conflict() {
    let (service, store) = service_with_store();
    store
        .add_role("editor", false, &[Permission::PlacesRead])
        .await;

    let result = service
        .create_role(create_input("editor", "EDITOR", &["places:read"]))
        .await;
    assert!(matches!(result, Err(AppError::RoleSlugConflict(_))));

    let result = service
        .create_role(create_input("editor-2", "EDITOR", &["places:read"]))
        .await;
    assert!(matches!(result, Err(AppError::RoleNameConflict(_))));
}

#[tokio::test]
async fn tombstoned_slug_can_be_reused() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("temp", false, &[Permission::PlacesRead])
        .await;
    service
        .delete_role(role_id)
        .await
        .unwrap_or_else(|_| unreachable!());

    let recreated = service
        .create_role(create_input("temp", "TEMP", &["plans:read"]))
        .await;

    assert!(matches!(recreated, Ok(role) if role.role_id != role_id));
}

#[tokio::test]
async fn get_role_hides_missing_and_tombstoned_roles() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("temp", false, &[Permission::PlacesRead])
        .await;

    assert!(service.get_role(role_id).await.is_ok());
    assert!(matches!(
        service.get_role(RoleId::new()).await,
        Err(AppError::RoleNotFound(_))
    ));

    service
        .delete_role(role_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(matches!(
        service.get_role(role_id).await,
        Err(AppError::RoleNotFound(_))
    ));
}

#[tokio::test]
async fn list_roles_pages_live_roles() {
    let (service, store) = service_with_store();
    for slug in ["a", "b", "c"] {
        store.add_role(slug, false, &[Permission::PlansRead]).await;
    }
    let deleted = store.add_role("d", false, &[Permission::PlansRead]).await;
    service
        .delete_role(deleted)
        .await
        .unwrap_or_else(|_| unreachable!());

    let page = service
        .list_roles(PageRequest::new(Some(2), Some(2)))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total, 3);
    assert_eq!(page.roles.len(), 1);
    assert_eq!(page.roles[0].slug, "c");
}

#[tokio::test]
async fn update_role_renames_and_replaces_grants() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("editor", false, &[Permission::PlacesRead, Permission::PlacesWrite])
        .await;

    let updated = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: Some("Senior Editor".to_owned()),
                permissions: Some(vec!["plans:read".to_owned()]),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.name, "Senior Editor");
    assert_eq!(updated.permissions, vec![Permission::PlansRead]);
    assert!(updated.updated_at >= updated.created_at);
}

#[tokio::test]
async fn update_role_allows_keeping_own_name() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("editor", false, &[Permission::PlacesRead])
        .await;

    let updated = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: Some("EDITOR".to_owned()),
                permissions: None,
            },
        )
        .await;

    assert!(matches!(updated, Ok(role) if role.permissions == vec![Permission::PlacesRead]));
}

#[tokio::test]
async fn update_role_rejects_name_held_by_another_role() {
    let (service, store) = service_with_store();
    store.add_role("client", false, &[Permission::PlansRead]).await;
    let role_id = store
        .add_role("editor", false, &[Permission::PlacesRead])
        .await;

    let result = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: Some("CLIENT".to_owned()),
                permissions: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::RoleNameConflict(_))));
}

#[tokio::test]
async fn invalid_permission_leaves_name_untouched() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("editor", false, &[Permission::PlacesRead])
        .await;

    let result = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: Some("Renamed".to_owned()),
                permissions: Some(vec!["places:fly".to_owned()]),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::PermissionInvalid(_))));

    let stored = service
        .get_role(role_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(stored.name, "EDITOR");
}

#[tokio::test]
async fn system_role_can_gain_but_not_lose_permissions() {
    let (service, store) = service_with_store();
    let role_id = store
        .add_role("admin", true, &[Permission::PlacesRead, Permission::RolesManage])
        .await;

    let shrink = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: None,
                permissions: Some(vec!["places:read".to_owned()]),
            },
        )
        .await;
    assert!(matches!(shrink, Err(AppError::SystemRoleProtected(_))));

    let unchanged = service
        .get_role(role_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        unchanged.permissions,
        vec![Permission::PlacesRead, Permission::RolesManage]
    );

    let grow = service
        .update_role(
            role_id,
            UpdateRoleInput {
                name: None,
                permissions: Some(vec![
                    "places:read".to_owned(),
                    "roles:manage".to_owned(),
                    "users:read".to_owned(),
                ]),
            },
        )
        .await;
    assert!(matches!(grow, Ok(role) if role.permissions.len() == 3));
}

#[tokio::test]
async fn delete_role_protects_system_roles() {
    let (service, store) = service_with_store();
    let system = store.add_role("admin", true, Permission::ALL).await;
    let custom = store
        .add_role("temp", false, &[Permission::PlacesRead])
        .await;

    assert!(matches!(
        service.delete_role(system).await,
        Err(AppError::SystemRoleProtected(_))
    ));
    assert!(!store.role_is_tombstoned(system).await);

    assert!(service.delete_role(custom).await.is_ok());
    assert!(store.role_is_tombstoned(custom).await);
    assert!(matches!(
        service.delete_role(custom).await,
        Err(AppError::RoleNotFound(_))
    ));
}
