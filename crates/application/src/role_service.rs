use std::collections::BTreeSet;
use std::sync::Arc;

use rolegate_core::{AppError, AppResult, PageRequest};
use rolegate_domain::{
    ADMIN_ROLE_SLUG, Permission, RoleId, RoleSlug, ensure_system_grants_retained,
    validate_role_name,
};
use tracing::info;

use crate::rbac_ports::{
    CreateRoleInput, NewRole, RoleDefinition, RolePage, RoleRepository, RoleUpdate,
    UpdateRoleInput,
};

/// Application service managing role definitions and their grants.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Creates a non-system role.
    ///
    /// Input problems are reported before permission keys, and both before any
    /// uniqueness conflict. The `admin` slug conflicts with a live admin role and
    /// is otherwise reserved.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleDefinition> {
        if input.slug.is_empty() || input.name.trim().is_empty() || input.permissions.is_empty() {
            return Err(AppError::Validation(
                "slug, name and permissions are required".to_owned(),
            ));
        }

        let slug = RoleSlug::new(input.slug)?;
        let name = validate_role_name(&input.name)?;
        let permissions = parse_permission_keys(&input.permissions)?;

        if self
            .repository
            .find_role_id_by_slug(slug.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::RoleSlugConflict(format!(
                "role with slug '{slug}' already exists"
            )));
        }

        if slug.is_admin() {
            return Err(AppError::Validation(format!(
                "role slug '{ADMIN_ROLE_SLUG}' is reserved"
            )));
        }

        if self
            .repository
            .find_role_id_by_name(name.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::RoleNameConflict(format!(
                "role with name '{}' already exists",
                name.as_str()
            )));
        }

        let role = self
            .repository
            .create_role(NewRole {
                slug,
                name,
                is_system: false,
                permissions,
            })
            .await?;

        info!(
            role_id = %role.role_id,
            slug = %role.slug,
            permission_count = role.permissions.len(),
            "role created"
        );

        Ok(role)
    }

    /// Returns a live role.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(format!("role '{role_id}' does not exist")))
    }

    /// Lists live roles.
    pub async fn list_roles(&self, page: PageRequest) -> AppResult<RolePage> {
        self.repository.list_roles(page).await
    }

    /// Renames a role and/or replaces its grant set.
    ///
    /// Nothing is written unless every supplied field validates.
    pub async fn update_role(
        &self,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleDefinition> {
        let current = self.get_role(role_id).await?;

        let mut update = RoleUpdate::default();

        if let Some(name) = input.name.as_deref() {
            let name = validate_role_name(name)?;
            let holder = self.repository.find_role_id_by_name(name.as_str()).await?;
            if holder.is_some_and(|holder| holder != role_id) {
                return Err(AppError::RoleNameConflict(format!(
                    "role with name '{}' already exists",
                    name.as_str()
                )));
            }
            update.name = Some(name);
        }

        if let Some(keys) = input.permissions.as_deref() {
            let permissions = parse_permission_keys(keys)?;
            if current.is_system {
                ensure_system_grants_retained(
                    &current.slug,
                    &current.permission_set(),
                    &permissions,
                )?;
            }
            update.permissions = Some(permissions);
        }

        if update.is_empty() {
            return Ok(current);
        }

        let role = self.repository.update_role(role_id, update).await?;

        info!(
            role_id = %role.role_id,
            slug = %role.slug,
            permission_count = role.permissions.len(),
            "role updated"
        );

        Ok(role)
    }

    /// Tombstones a non-system role.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let role = self.get_role(role_id).await?;
        if role.is_system {
            return Err(AppError::SystemRoleProtected(format!(
                "system role '{}' cannot be deleted",
                role.slug
            )));
        }

        self.repository.soft_delete_role(role_id).await?;

        info!(role_id = %role_id, slug = %role.slug, "role deleted");
        Ok(())
    }
}

fn parse_permission_keys(keys: &[String]) -> AppResult<BTreeSet<Permission>> {
    keys.iter()
        .map(|key| Permission::from_transport(key.as_str()))
        .collect()
}

#[cfg(test)]
mod tests;
