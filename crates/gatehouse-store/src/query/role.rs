//! Role repository.

use std::future::Future;

use jiff::Timestamp;

use super::normalize_optional;
use crate::client::Tables;
use crate::model::{NewRole, Role, UpdateRole};
use crate::{StoreClient, StoreError, StoreResult, TRACING_TARGET_QUERY};

const ENTITY: &str = "role";

/// Repository for role rows and their permission grants.
pub trait RoleRepository {
    /// Inserts a new role.
    ///
    /// Fails with [`StoreError::Conflict`] when the name is taken and with
    /// [`StoreError::NotFound`] when a granted permission does not exist.
    fn create_role(&self, new_role: NewRole) -> impl Future<Output = StoreResult<Role>> + Send;

    /// Returns the role with the payload's name, creating it when missing.
    fn ensure_role(&self, new_role: NewRole) -> impl Future<Output = StoreResult<Role>> + Send;

    /// Finds a role by its identifier.
    fn find_role_by_id(
        &self,
        role_id: i64,
    ) -> impl Future<Output = StoreResult<Option<Role>>> + Send;

    /// Finds a role by its unique name.
    fn find_role_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = StoreResult<Option<Role>>> + Send;

    /// Finds every role whose identifier is in `role_ids`, in identifier order.
    fn find_roles_by_ids(
        &self,
        role_ids: &[i64],
    ) -> impl Future<Output = StoreResult<Vec<Role>>> + Send;

    /// Lists all roles in identifier order.
    fn list_roles(&self) -> impl Future<Output = StoreResult<Vec<Role>>> + Send;

    /// Lists the active roles in identifier order.
    fn list_active_roles(&self) -> impl Future<Output = StoreResult<Vec<Role>>> + Send;

    /// Applies a partial update to a role.
    fn update_role(
        &self,
        role_id: i64,
        updates: UpdateRole,
    ) -> impl Future<Output = StoreResult<Role>> + Send;

    /// Grants additional permissions to a role.
    ///
    /// Nothing is written when any of the permissions does not exist.
    fn add_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> impl Future<Output = StoreResult<Role>> + Send;

    /// Revokes permissions from a role. Ids the role does not hold are ignored.
    fn remove_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> impl Future<Output = StoreResult<Role>> + Send;

    /// Deletes a role.
    ///
    /// Fails with [`StoreError::InUse`] while any user is assigned the role.
    fn delete_role(&self, role_id: i64) -> impl Future<Output = StoreResult<()>> + Send;

    /// Checks whether a role name is taken.
    fn role_name_exists(&self, name: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}

/// Fails with the first permission identifier that has no row.
fn check_permissions_exist(tables: &Tables, permission_ids: &[i64]) -> StoreResult<()> {
    match permission_ids
        .iter()
        .find(|id| !tables.permissions.contains(**id))
    {
        Some(missing) => Err(StoreError::not_found("permission", *missing)),
        None => Ok(()),
    }
}

fn insert_role(tables: &mut Tables, new_role: NewRole, name: String) -> Role {
    let now = Timestamp::now();
    let role = Role {
        id: tables.roles.next_id(),
        name,
        description: normalize_optional(new_role.description),
        active: new_role.active,
        permission_ids: new_role.permission_ids,
        created_at: now,
        updated_at: now,
    };

    tables.roles.rows.insert(role.id, role.clone());
    tracing::debug!(
        target: TRACING_TARGET_QUERY,
        role_id = role.id,
        name = %role.name,
        permissions = role.permission_ids.len(),
        "Role created",
    );

    role
}

impl RoleRepository for StoreClient {
    async fn create_role(&self, new_role: NewRole) -> StoreResult<Role> {
        let name = new_role.name.trim().to_owned();

        let mut tables = self.write().await;
        if tables.roles.values().any(|r| r.name == name) {
            tracing::debug!(target: TRACING_TARGET_QUERY, name = %name, "Duplicate role name");
            return Err(StoreError::conflict(ENTITY, name));
        }

        let permission_ids: Vec<i64> = new_role.permission_ids.iter().copied().collect();
        check_permissions_exist(&tables, &permission_ids)?;

        Ok(insert_role(&mut tables, new_role, name))
    }

    async fn ensure_role(&self, new_role: NewRole) -> StoreResult<Role> {
        let name = new_role.name.trim().to_owned();

        let mut tables = self.write().await;
        if let Some(role) = tables.roles.values().find(|r| r.name == name) {
            return Ok(role.clone());
        }

        let permission_ids: Vec<i64> = new_role.permission_ids.iter().copied().collect();
        check_permissions_exist(&tables, &permission_ids)?;

        Ok(insert_role(&mut tables, new_role, name))
    }

    async fn find_role_by_id(&self, role_id: i64) -> StoreResult<Option<Role>> {
        let tables = self.read().await;
        Ok(tables.roles.rows.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        let tables = self.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn find_roles_by_ids(&self, role_ids: &[i64]) -> StoreResult<Vec<Role>> {
        let tables = self.read().await;
        Ok(tables
            .roles
            .values()
            .filter(|r| role_ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let tables = self.read().await;
        Ok(tables.roles.values().cloned().collect())
    }

    async fn list_active_roles(&self) -> StoreResult<Vec<Role>> {
        let tables = self.read().await;
        Ok(tables.roles.values().filter(|r| r.active).cloned().collect())
    }

    async fn update_role(&self, role_id: i64, updates: UpdateRole) -> StoreResult<Role> {
        let mut tables = self.write().await;
        let role = tables
            .roles
            .rows
            .get_mut(&role_id)
            .ok_or(StoreError::not_found(ENTITY, role_id))?;

        if let Some(description) = updates.description {
            role.description = normalize_optional(Some(description));
        }
        if let Some(active) = updates.active {
            role.active = active;
        }
        role.updated_at = Timestamp::now();

        Ok(role.clone())
    }

    async fn add_role_permissions(&self, role_id: i64, permission_ids: &[i64]) -> StoreResult<Role> {
        let mut tables = self.write().await;
        if !tables.roles.contains(role_id) {
            return Err(StoreError::not_found(ENTITY, role_id));
        }
        check_permissions_exist(&tables, permission_ids)?;

        let role = tables
            .roles
            .rows
            .get_mut(&role_id)
            .ok_or(StoreError::not_found(ENTITY, role_id))?;
        role.permission_ids.extend(permission_ids.iter().copied());
        role.updated_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            role_id,
            added = permission_ids.len(),
            "Permissions granted to role",
        );

        Ok(role.clone())
    }

    async fn remove_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> StoreResult<Role> {
        let mut tables = self.write().await;
        let role = tables
            .roles
            .rows
            .get_mut(&role_id)
            .ok_or(StoreError::not_found(ENTITY, role_id))?;

        role.permission_ids.retain(|id| !permission_ids.contains(id));
        role.updated_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            role_id,
            removed = permission_ids.len(),
            "Permissions revoked from role",
        );

        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: i64) -> StoreResult<()> {
        let mut tables = self.write().await;
        if !tables.roles.contains(role_id) {
            return Err(StoreError::not_found(ENTITY, role_id));
        }

        if tables.users.values().any(|u| u.role_ids.contains(&role_id)) {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                role_id,
                "Refusing to delete a role assigned to users",
            );
            return Err(StoreError::in_use(ENTITY, role_id));
        }

        tables.roles.rows.remove(&role_id);
        tracing::debug!(target: TRACING_TARGET_QUERY, role_id, "Role deleted");

        Ok(())
    }

    async fn role_name_exists(&self, name: &str) -> StoreResult<bool> {
        let tables = self.read().await;
        Ok(tables.roles.values().any(|r| r.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewPermission, NewUser};
    use crate::query::{PermissionRepository, UserRepository};

    async fn seed_permissions(store: &StoreClient) -> anyhow::Result<(i64, i64)> {
        let read = store
            .create_permission(NewPermission::new("READ_ROLE", "ROLE", "READ"))
            .await?;
        let update = store
            .create_permission(NewPermission::new("UPDATE_ROLE", "ROLE", "UPDATE"))
            .await?;
        Ok((read.id, update.id))
    }

    #[tokio::test]
    async fn create_rejects_unknown_permission() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let (read, _) = seed_permissions(&store).await?;

        let result = store
            .create_role(NewRole::new("ROLE_EDITOR").with_permissions([read, 99]))
            .await;
        assert_eq!(result, Err(StoreError::not_found("permission", 99)));
        assert!(!store.role_name_exists("ROLE_EDITOR").await?);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() -> anyhow::Result<()> {
        let store = StoreClient::new();
        store.create_role(NewRole::new("ROLE_USER")).await?;

        let result = store.create_role(NewRole::new(" ROLE_USER ")).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn ensure_role_is_idempotent() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let first = store.ensure_role(NewRole::new("ROLE_USER")).await?;
        let second = store.ensure_role(NewRole::new("ROLE_USER")).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_roles().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_and_active_listing() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let role = store
            .create_role(NewRole::new("ROLE_USER").with_description("Default user role"))
            .await?;

        let updated = store
            .update_role(
                role.id,
                UpdateRole {
                    active: Some(false),
                    ..UpdateRole::default()
                },
            )
            .await?;
        assert!(!updated.active);
        assert_eq!(updated.description.as_deref(), Some("Default user role"));
        assert!(store.list_active_roles().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn grants_and_revokes_permissions() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let (read, update) = seed_permissions(&store).await?;
        let role = store.create_role(NewRole::new("ROLE_EDITOR")).await?;

        let role = store.add_role_permissions(role.id, &[read, update]).await?;
        assert!(role.grants(read) && role.grants(update));

        let failed = store.add_role_permissions(role.id, &[77]).await;
        assert_eq!(failed, Err(StoreError::not_found("permission", 77)));

        let role = store.remove_role_permissions(role.id, &[read]).await?;
        assert!(!role.grants(read));
        assert!(role.grants(update));
        Ok(())
    }

    #[tokio::test]
    async fn delete_refused_while_assigned() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let role = store.create_role(NewRole::new("ROLE_USER")).await?;
        store
            .create_user(NewUser::new("a@example.com", "hash", "A").with_roles([role.id]))
            .await?;

        let result = store.delete_role(role.id).await;
        assert_eq!(result, Err(StoreError::in_use("role", role.id)));
        Ok(())
    }
}
