use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use rolegate_core::{AppError, AppResult, PageRequest, UserId};
use rolegate_domain::{Permission, RoleAuditAction, RoleId};

use crate::rbac_ports::{
    AssignedRole, AuditRoleRef, AuditUserRef, AuthorizationRepository, GrantOutcome, NewRole,
    ResourceOwnerRepository, RoleAuditEntry, RoleAuditLogRepository, RoleAuditPage,
    RoleAuditQuery, RoleChange, RoleDefinition, RoleGrant, RolePage, RoleRepository, RoleUpdate,
    UserDirectory, UserRoleRepository,
};

struct StoredRole {
    definition: RoleDefinition,
    deleted: bool,
}

#[derive(Default)]
struct FakeState {
    users: HashMap<UserId, String>,
    roles: Vec<StoredRole>,
    assignments: Vec<(UserId, RoleId, DateTime<Utc>)>,
    audit: Vec<RoleAuditEntry>,
    owners: HashMap<Uuid, Option<UserId>>,
}

impl FakeState {
    fn live_role(&self, role_id: RoleId) -> Option<&RoleDefinition> {
        self.roles
            .iter()
            .find(|role| !role.deleted && role.definition.role_id == role_id)
            .map(|role| &role.definition)
    }

    fn record(&mut self, change: &RoleChange, action: RoleAuditAction) {
        let entry = RoleAuditEntry {
            entry_id: Uuid::new_v4(),
            actor: AuditUserRef {
                user_id: change.actor_id,
                name: self.users.get(&change.actor_id).cloned(),
            },
            action,
            target_user: AuditUserRef {
                user_id: change.target_user_id,
                name: self.users.get(&change.target_user_id).cloned(),
            },
            role: AuditRoleRef {
                role_id: change.role_id,
                slug: change.role_slug.clone(),
                name: self.live_role(change.role_id).map(|role| role.name.clone()),
            },
            created_at: Utc::now(),
        };
        self.audit.push(entry);
    }
}

/// In-memory store implementing every RBAC port for service tests.
#[derive(Default)]
pub(crate) struct FakeRbacStore {
    state: Mutex<FakeState>,
    stale_assignment_reads: bool,
}

impl FakeRbacStore {
    /// Store whose assignment lookups always miss, as if a concurrent writer won the race.
    pub(crate) fn with_stale_assignment_reads() -> Self {
        Self {
            stale_assignment_reads: true,
            ..Self::default()
        }
    }

    pub(crate) async fn add_user(&self, name: &str) -> UserId {
        let user_id = UserId::new();
        self.state
            .lock()
            .await
            .users
            .insert(user_id, name.to_owned());
        user_id
    }

    pub(crate) async fn add_role(
        &self,
        slug: &str,
        is_system: bool,
        permissions: &[Permission],
    ) -> RoleId {
        let role_id = RoleId::new();
        let now = Utc::now();
        let mut permissions = permissions.to_vec();
        permissions.sort();
        permissions.dedup();
        self.state.lock().await.roles.push(StoredRole {
            definition: RoleDefinition {
                role_id,
                slug: slug.to_owned(),
                name: slug.to_uppercase(),
                is_system,
                permissions,
                created_at: now,
                updated_at: now,
            },
            deleted: false,
        });
        role_id
    }

    pub(crate) async fn assign_directly(&self, user_id: UserId, role_id: RoleId) {
        self.state
            .lock()
            .await
            .assignments
            .push((user_id, role_id, Utc::now()));
    }

    pub(crate) async fn set_owner(&self, resource_id: Uuid, owner: Option<UserId>) {
        self.state.lock().await.owners.insert(resource_id, owner);
    }

    pub(crate) async fn role_is_tombstoned(&self, role_id: RoleId) -> bool {
        self.state
            .lock()
            .await
            .roles
            .iter()
            .any(|role| role.deleted && role.definition.role_id == role_id)
    }

    pub(crate) async fn assignment_count(&self) -> usize {
        self.state.lock().await.assignments.len()
    }

    pub(crate) async fn audit_entries(&self) -> Vec<RoleAuditEntry> {
        self.state.lock().await.audit.clone()
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        Ok(self.state.lock().await.live_role(role_id).cloned())
    }

    async fn find_role_id_by_slug(&self, slug: &str) -> AppResult<Option<RoleId>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .iter()
            .find(|role| !role.deleted && role.definition.slug == slug)
            .map(|role| role.definition.role_id))
    }

    async fn find_role_id_by_name(&self, name: &str) -> AppResult<Option<RoleId>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .iter()
            .find(|role| !role.deleted && role.definition.name == name)
            .map(|role| role.definition.role_id))
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<RolePage> {
        let state = self.state.lock().await;
        let live: Vec<RoleDefinition> = state
            .roles
            .iter()
            .filter(|role| !role.deleted)
            .map(|role| role.definition.clone())
            .collect();
        let total = live.len() as u64;
        let roles = live
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .collect();
        Ok(RolePage { roles, total })
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let now = Utc::now();
        let definition = RoleDefinition {
            role_id: RoleId::new(),
            slug: role.slug.as_str().to_owned(),
            name: role.name.as_str().to_owned(),
            is_system: role.is_system,
            permissions: role.permissions.into_iter().collect(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.roles.push(StoredRole {
            definition: definition.clone(),
            deleted: false,
        });
        Ok(definition)
    }

    async fn update_role(&self, role_id: RoleId, update: RoleUpdate) -> AppResult<RoleDefinition> {
        let mut state = self.state.lock().await;
        let stored = state
            .roles
            .iter_mut()
            .find(|role| !role.deleted && role.definition.role_id == role_id)
            .ok_or_else(|| AppError::RoleNotFound(role_id.to_string()))?;
        if let Some(name) = update.name {
            stored.definition.name = name.into();
        }
        if let Some(permissions) = update.permissions {
            stored.definition.permissions = permissions.into_iter().collect();
        }
        stored.definition.updated_at = Utc::now();
        Ok(stored.definition.clone())
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .roles
            .iter_mut()
            .find(|role| !role.deleted && role.definition.role_id == role_id)
            .ok_or_else(|| AppError::RoleNotFound(role_id.to_string()))?;
        stored.deleted = true;
        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for FakeRbacStore {
    async fn list_role_grants(
        &self,
        user_id: UserId,
        permission_key: &str,
    ) -> AppResult<Vec<RoleGrant>> {
        let state = self.state.lock().await;
        Ok(state
            .assignments
            .iter()
            .filter(|(assigned_user, _, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id, _)| state.live_role(*role_id))
            .map(|role| RoleGrant {
                role_id: role.role_id,
                slug: role.slug.clone(),
                grants_permission: role
                    .permissions
                    .iter()
                    .any(|permission| permission.as_str() == permission_key),
            })
            .collect())
    }
}

#[async_trait]
impl ResourceOwnerRepository for FakeRbacStore {
    async fn find_owner(&self, resource_id: Uuid) -> AppResult<Option<UserId>> {
        Ok(self
            .state
            .lock()
            .await
            .owners
            .get(&resource_id)
            .copied()
            .flatten())
    }
}

#[async_trait]
impl UserDirectory for FakeRbacStore {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&user_id))
    }
}

#[async_trait]
impl UserRoleRepository for FakeRbacStore {
    async fn find_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<Option<DateTime<Utc>>> {
        if self.stale_assignment_reads {
            return Ok(None);
        }

        Ok(self
            .state
            .lock()
            .await
            .assignments
            .iter()
            .find(|(assigned_user, assigned_role, _)| {
                *assigned_user == user_id && *assigned_role == role_id
            })
            .map(|(_, _, assigned_at)| *assigned_at))
    }

    async fn grant_role(&self, change: RoleChange) -> AppResult<GrantOutcome> {
        let mut state = self.state.lock().await;
        if let Some((_, _, assigned_at)) =
            state.assignments.iter().find(|(user_id, role_id, _)| {
                *user_id == change.target_user_id && *role_id == change.role_id
            })
        {
            return Ok(GrantOutcome::Existing(*assigned_at));
        }

        let assigned_at = Utc::now();
        state
            .assignments
            .push((change.target_user_id, change.role_id, assigned_at));
        state.record(&change, RoleAuditAction::Assign);
        Ok(GrantOutcome::Created(assigned_at))
    }

    async fn revoke_role(&self, change: RoleChange) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.assignments.len();
        state.assignments.retain(|(user_id, role_id, _)| {
            !(*user_id == change.target_user_id && *role_id == change.role_id)
        });
        if state.assignments.len() == before {
            return Ok(false);
        }

        state.record(&change, RoleAuditAction::Remove);
        Ok(true)
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<AssignedRole>> {
        let state = self.state.lock().await;
        Ok(state
            .assignments
            .iter()
            .filter(|(assigned_user, _, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id, assigned_at)| {
                state.live_role(*role_id).map(|role| AssignedRole {
                    role_id: role.role_id,
                    slug: role.slug.clone(),
                    name: role.name.clone(),
                    is_system: role.is_system,
                    assigned_at: *assigned_at,
                })
            })
            .collect())
    }
}

#[async_trait]
impl RoleAuditLogRepository for FakeRbacStore {
    async fn list_entries(&self, query: RoleAuditQuery) -> AppResult<RoleAuditPage> {
        let state = self.state.lock().await;
        let mut matching: Vec<RoleAuditEntry> = state
            .audit
            .iter()
            .filter(|entry| {
                query
                    .target_user_id
                    .is_none_or(|user_id| entry.target_user.user_id == user_id)
                    && query.role_id.is_none_or(|role_id| entry.role.role_id == role_id)
                    && query.action.is_none_or(|action| entry.action == action)
            })
            .cloned()
            .collect();
        matching.reverse();
        let total = matching.len() as u64;
        let entries = matching
            .into_iter()
            .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
            .take(query.page.limit() as usize)
            .collect();
        Ok(RoleAuditPage { entries, total })
    }
}
