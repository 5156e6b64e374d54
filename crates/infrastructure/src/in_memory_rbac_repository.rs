use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use rolegate_application::rbac_ports::{
    AssignedRole, AuditRoleRef, AuditUserRef, AuthorizationRepository, GrantOutcome, NewRole,
    ResourceOwnerRepository, RoleAuditEntry, RoleAuditLogRepository, RoleAuditPage,
    RoleAuditQuery, RoleChange, RoleDefinition, RoleGrant, RolePage, RoleRepository, RoleUpdate,
    UserDirectory, UserRoleRepository,
};
use rolegate_core::{AppError, AppResult, PageRequest, UserId};
use rolegate_domain::{
    Permission, RoleAuditAction, RoleId, default_roles, ensure_system_grants_retained,
};

#[derive(Debug, Clone)]
struct StoredRole {
    role_id: RoleId,
    slug: String,
    name: String,
    is_system: bool,
    permissions: BTreeSet<Permission>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredRole {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn to_definition(&self) -> RoleDefinition {
        RoleDefinition {
            role_id: self.role_id,
            slug: self.slug.clone(),
            name: self.name.clone(),
            is_system: self.is_system,
            permissions: self.permissions.iter().copied().collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredAuditEntry {
    entry_id: Uuid,
    actor_id: UserId,
    action: RoleAuditAction,
    target_user_id: UserId,
    role_id: RoleId,
    role_slug: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct RbacState {
    users: HashMap<UserId, String>,
    places: HashMap<Uuid, Option<UserId>>,
    roles: Vec<StoredRole>,
    assignments: HashMap<(UserId, RoleId), DateTime<Utc>>,
    audit: Vec<StoredAuditEntry>,
}

impl RbacState {
    fn live_role(&self, role_id: RoleId) -> Option<&StoredRole> {
        self.roles
            .iter()
            .find(|role| role.is_live() && role.role_id == role_id)
    }

    fn live_role_mut(&mut self, role_id: RoleId) -> Option<&mut StoredRole> {
        self.roles
            .iter_mut()
            .find(|role| role.is_live() && role.role_id == role_id)
    }

    fn live_role_by(&self, predicate: impl Fn(&StoredRole) -> bool) -> Option<RoleId> {
        self.roles
            .iter()
            .find(|role| role.is_live() && predicate(role))
            .map(|role| role.role_id)
    }

    fn record(&mut self, change: &RoleChange, action: RoleAuditAction, at: DateTime<Utc>) {
        self.audit.push(StoredAuditEntry {
            entry_id: Uuid::new_v4(),
            actor_id: change.actor_id,
            action,
            target_user_id: change.target_user_id,
            role_id: change.role_id,
            role_slug: change.role_slug.clone(),
            created_at: at,
        });
    }
}

/// In-memory implementation of every RBAC port.
///
/// All ports share one lock, so each write is atomic with its audit entry.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directory user and returns its identifier.
    pub async fn add_user(&self, name: &str) -> UserId {
        let user_id = UserId::new();
        self.state
            .write()
            .await
            .users
            .insert(user_id, name.to_owned());
        user_id
    }

    /// Registers a place with an optional owner and returns its identifier.
    pub async fn add_place(&self, owner: Option<UserId>) -> Uuid {
        let place_id = Uuid::new_v4();
        self.state.write().await.places.insert(place_id, owner);
        place_id
    }

    /// Creates missing default roles and baseline grants without removing anything.
    pub async fn ensure_default_roles(&self) {
        let mut state = self.state.write().await;
        for default in default_roles() {
            let existing = state.live_role_by(|role| role.slug == default.slug);
            let role_id = match existing {
                Some(role_id) => role_id,
                None if state.live_role_by(|role| role.name == default.name).is_some() => {
                    continue;
                }
                None => {
                    let now = Utc::now();
                    let role_id = RoleId::new();
                    state.roles.push(StoredRole {
                        role_id,
                        slug: default.slug.to_owned(),
                        name: default.name.to_owned(),
                        is_system: default.is_system,
                        permissions: BTreeSet::new(),
                        created_at: now,
                        updated_at: now,
                        deleted_at: None,
                    });
                    role_id
                }
            };

            if let Some(role) = state.live_role_mut(role_id) {
                role.permissions.extend(default.permissions.iter().copied());
            }
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .state
            .read()
            .await
            .live_role(role_id)
            .map(StoredRole::to_definition))
    }

    async fn find_role_id_by_slug(&self, slug: &str) -> AppResult<Option<RoleId>> {
        Ok(self.state.read().await.live_role_by(|role| role.slug == slug))
    }

    async fn find_role_id_by_name(&self, name: &str) -> AppResult<Option<RoleId>> {
        Ok(self.state.read().await.live_role_by(|role| role.name == name))
    }

    async fn list_roles(&self, page: PageRequest) -> AppResult<RolePage> {
        let state = self.state.read().await;
        let mut live: Vec<&StoredRole> = state.roles.iter().filter(|role| role.is_live()).collect();
        live.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.role_id.cmp(&right.role_id))
        });

        Ok(RolePage {
            total: live.len() as u64,
            roles: live
                .into_iter()
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(page.limit() as usize)
                .map(StoredRole::to_definition)
                .collect(),
        })
    }

    async fn create_role(&self, role: NewRole) -> AppResult<RoleDefinition> {
        let mut state = self.state.write().await;

        if state
            .live_role_by(|stored| stored.slug == role.slug.as_str())
            .is_some()
        {
            return Err(AppError::RoleSlugConflict(format!(
                "role with slug '{}' already exists",
                role.slug
            )));
        }
        if state
            .live_role_by(|stored| stored.name == role.name.as_str())
            .is_some()
        {
            return Err(AppError::RoleNameConflict(format!(
                "role with name '{}' already exists",
                role.name.as_str()
            )));
        }

        let now = Utc::now();
        let stored = StoredRole {
            role_id: RoleId::new(),
            slug: role.slug.as_str().to_owned(),
            name: role.name.into(),
            is_system: role.is_system,
            permissions: role.permissions,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let definition = stored.to_definition();
        state.roles.push(stored);

        Ok(definition)
    }

    async fn update_role(&self, role_id: RoleId, update: RoleUpdate) -> AppResult<RoleDefinition> {
        let mut state = self.state.write().await;

        let not_found = || AppError::RoleNotFound(format!("role '{role_id}' does not exist"));
        let current = state.live_role(role_id).ok_or_else(not_found)?;

        if let Some(permissions) = &update.permissions
            && current.is_system
        {
            ensure_system_grants_retained(&current.slug, &current.permissions, permissions)?;
        }

        if let Some(name) = &update.name
            && state
                .live_role_by(|role| role.name == name.as_str() && role.role_id != role_id)
                .is_some()
        {
            return Err(AppError::RoleNameConflict(format!(
                "role with name '{}' already exists",
                name.as_str()
            )));
        }

        let role = state.live_role_mut(role_id).ok_or_else(not_found)?;
        if let Some(name) = update.name {
            role.name = name.into();
        }
        if let Some(permissions) = update.permissions {
            role.permissions = permissions;
        }
        role.updated_at = Utc::now();

        Ok(role.to_definition())
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let role = state
            .live_role_mut(role_id)
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))?;

        if role.is_system {
            return Err(AppError::SystemRoleProtected(format!(
                "system role '{}' cannot be deleted",
                role.slug
            )));
        }

        let now = Utc::now();
        role.deleted_at = Some(now);
        role.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryRbacRepository {
    async fn list_role_grants(
        &self,
        user_id: UserId,
        permission_key: &str,
    ) -> AppResult<Vec<RoleGrant>> {
        let state = self.state.read().await;
        Ok(state
            .assignments
            .keys()
            .filter(|(assigned_user, _)| *assigned_user == user_id)
            .filter_map(|(_, role_id)| state.live_role(*role_id))
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
impl ResourceOwnerRepository for InMemoryRbacRepository {
    async fn find_owner(&self, resource_id: Uuid) -> AppResult<Option<UserId>> {
        Ok(self
            .state
            .read()
            .await
            .places
            .get(&resource_id)
            .copied()
            .flatten())
    }
}

#[async_trait]
impl UserDirectory for InMemoryRbacRepository {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.state.read().await.users.contains_key(&user_id))
    }
}

#[async_trait]
impl UserRoleRepository for InMemoryRbacRepository {
    async fn find_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<Option<DateTime<Utc>>> {
        Ok(self
            .state
            .read()
            .await
            .assignments
            .get(&(user_id, role_id))
            .copied())
    }

    async fn grant_role(&self, change: RoleChange) -> AppResult<GrantOutcome> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&change.target_user_id) {
            return Err(AppError::UserNotFound(format!(
                "user '{}' does not exist",
                change.target_user_id
            )));
        }

        let key = (change.target_user_id, change.role_id);
        if let Some(assigned_at) = state.assignments.get(&key) {
            return Ok(GrantOutcome::Existing(*assigned_at));
        }

        let assigned_at = Utc::now();
        state.assignments.insert(key, assigned_at);
        state.record(&change, RoleAuditAction::Assign, assigned_at);

        Ok(GrantOutcome::Created(assigned_at))
    }

    async fn revoke_role(&self, change: RoleChange) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state
            .assignments
            .remove(&(change.target_user_id, change.role_id))
            .is_none()
        {
            return Ok(false);
        }

        state.record(&change, RoleAuditAction::Remove, Utc::now());
        Ok(true)
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<AssignedRole>> {
        let state = self.state.read().await;
        let mut roles: Vec<AssignedRole> = state
            .assignments
            .iter()
            .filter(|((assigned_user, _), _)| *assigned_user == user_id)
            .filter_map(|((_, role_id), assigned_at)| {
                state.live_role(*role_id).map(|role| AssignedRole {
                    role_id: role.role_id,
                    slug: role.slug.clone(),
                    name: role.name.clone(),
                    is_system: role.is_system,
                    assigned_at: *assigned_at,
                })
            })
            .collect();
        roles.sort_by(|left, right| {
            left.assigned_at
                .cmp(&right.assigned_at)
                .then_with(|| left.slug.cmp(&right.slug))
        });

        Ok(roles)
    }
}

#[async_trait]
impl RoleAuditLogRepository for InMemoryRbacRepository {
    async fn list_entries(&self, query: RoleAuditQuery) -> AppResult<RoleAuditPage> {
        let state = self.state.read().await;
        let matching: Vec<&StoredAuditEntry> = state
            .audit
            .iter()
            .rev()
            .filter(|entry| {
                query
                    .target_user_id
                    .is_none_or(|user_id| entry.target_user_id == user_id)
                    && query.role_id.is_none_or(|role_id| entry.role_id == role_id)
                    && query.action.is_none_or(|action| entry.action == action)
            })
            .collect();

        Ok(RoleAuditPage {
            total: matching.len() as u64,
            entries: matching
                .into_iter()
                .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
                .take(query.page.limit() as usize)
                .map(|entry| RoleAuditEntry {
                    entry_id: entry.entry_id,
                    actor: AuditUserRef {
                        user_id: entry.actor_id,
                        name: state.users.get(&entry.actor_id).cloned(),
                    },
                    action: entry.action,
                    target_user: AuditUserRef {
                        user_id: entry.target_user_id,
                        name: state.users.get(&entry.target_user_id).cloned(),
                    },
                    role: AuditRoleRef {
                        role_id: entry.role_id,
                        slug: entry.role_slug.clone(),
                        name: state.live_role(entry.role_id).map(|role| role.name.clone()),
                    },
                    created_at: entry.created_at,
                })
                .collect(),
        })
    }
}
