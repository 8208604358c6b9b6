//! Permission repository.

use std::future::Future;

use jiff::Timestamp;

use super::normalize_optional;
use crate::model::{NewPermission, Permission};
use crate::{StoreClient, StoreError, StoreResult, TRACING_TARGET_QUERY};

const ENTITY: &str = "permission";

/// Repository for permission rows.
pub trait PermissionRepository {
    /// Inserts a new permission.
    ///
    /// Fails with [`StoreError::Conflict`] when the name is taken.
    fn create_permission(
        &self,
        new_permission: NewPermission,
    ) -> impl Future<Output = StoreResult<Permission>> + Send;

    /// Finds a permission by its identifier.
    fn find_permission_by_id(
        &self,
        permission_id: i64,
    ) -> impl Future<Output = StoreResult<Option<Permission>>> + Send;

    /// Finds a permission by its unique name.
    fn find_permission_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = StoreResult<Option<Permission>>> + Send;

    /// Finds every permission whose identifier is in `permission_ids`.
    ///
    /// Unknown identifiers are skipped. Results are in identifier order.
    fn find_permissions_by_ids(
        &self,
        permission_ids: &[i64],
    ) -> impl Future<Output = StoreResult<Vec<Permission>>> + Send;

    /// Lists all permissions in identifier order.
    fn list_permissions(&self) -> impl Future<Output = StoreResult<Vec<Permission>>> + Send;

    /// Lists the permissions that apply to a resource.
    fn list_permissions_by_resource(
        &self,
        resource: &str,
    ) -> impl Future<Output = StoreResult<Vec<Permission>>> + Send;

    /// Replaces the description of a permission.
    fn update_permission_description(
        &self,
        permission_id: i64,
        description: Option<String>,
    ) -> impl Future<Output = StoreResult<Permission>> + Send;

    /// Deletes a permission.
    ///
    /// Fails with [`StoreError::InUse`] while any role still grants it.
    fn delete_permission(&self, permission_id: i64) -> impl Future<Output = StoreResult<()>> + Send;

    /// Checks whether a permission name is taken.
    fn permission_name_exists(&self, name: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}

impl PermissionRepository for StoreClient {
    async fn create_permission(&self, new_permission: NewPermission) -> StoreResult<Permission> {
        let name = new_permission.name.trim().to_owned();

        let mut tables = self.write().await;
        if tables.permissions.values().any(|p| p.name == name) {
            tracing::debug!(target: TRACING_TARGET_QUERY, name = %name, "Duplicate permission name");
            return Err(StoreError::conflict(ENTITY, name));
        }

        let now = Timestamp::now();
        let permission = Permission {
            id: tables.permissions.next_id(),
            name,
            description: normalize_optional(new_permission.description),
            resource: new_permission.resource.trim().to_owned(),
            action: new_permission.action.trim().to_owned(),
            created_at: now,
            updated_at: now,
        };

        tables.permissions.rows.insert(permission.id, permission.clone());
        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            permission_id = permission.id,
            name = %permission.name,
            "Permission created",
        );

        Ok(permission)
    }

    async fn find_permission_by_id(&self, permission_id: i64) -> StoreResult<Option<Permission>> {
        let tables = self.read().await;
        Ok(tables.permissions.rows.get(&permission_id).cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> StoreResult<Option<Permission>> {
        let tables = self.read().await;
        Ok(tables.permissions.values().find(|p| p.name == name).cloned())
    }

    async fn find_permissions_by_ids(&self, permission_ids: &[i64]) -> StoreResult<Vec<Permission>> {
        let tables = self.read().await;
        Ok(tables
            .permissions
            .values()
            .filter(|p| permission_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        let tables = self.read().await;
        Ok(tables.permissions.values().cloned().collect())
    }

    async fn list_permissions_by_resource(&self, resource: &str) -> StoreResult<Vec<Permission>> {
        let tables = self.read().await;
        Ok(tables
            .permissions
            .values()
            .filter(|p| p.resource == resource)
            .cloned()
            .collect())
    }

    async fn update_permission_description(
        &self,
        permission_id: i64,
        description: Option<String>,
    ) -> StoreResult<Permission> {
        let mut tables = self.write().await;
        let permission = tables
            .permissions
            .rows
            .get_mut(&permission_id)
            .ok_or(StoreError::not_found(ENTITY, permission_id))?;

        permission.description = normalize_optional(description);
        permission.updated_at = Timestamp::now();

        Ok(permission.clone())
    }

    async fn delete_permission(&self, permission_id: i64) -> StoreResult<()> {
        let mut tables = self.write().await;
        if !tables.permissions.contains(permission_id) {
            return Err(StoreError::not_found(ENTITY, permission_id));
        }

        if tables.roles.values().any(|r| r.grants(permission_id)) {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                permission_id,
                "Refusing to delete a permission granted by a role",
            );
            return Err(StoreError::in_use(ENTITY, permission_id));
        }

        tables.permissions.rows.remove(&permission_id);
        tracing::debug!(target: TRACING_TARGET_QUERY, permission_id, "Permission deleted");

        Ok(())
    }

    async fn permission_name_exists(&self, name: &str) -> StoreResult<bool> {
        let tables = self.read().await;
        Ok(tables.permissions.values().any(|p| p.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewRole;
    use crate::query::RoleRepository;

    #[tokio::test]
    async fn duplicate_names_conflict() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let created = store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await?;
        assert_eq!(created.id, 1);

        let result = store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        assert!(store.permission_name_exists("READ_PRODUCTS").await?);
        Ok(())
    }

    #[tokio::test]
    async fn lists_by_resource() -> anyhow::Result<()> {
        let store = StoreClient::new();
        store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await?;
        store
            .create_permission(NewPermission::new("READ_USER", "USER", "READ"))
            .await?;

        let products = store.list_permissions_by_resource("PRODUCT").await?;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "READ_PRODUCTS");
        assert_eq!(store.list_permissions().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn updates_description() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let permission = store
            .create_permission(NewPermission::new("READ_USER", "USER", "READ"))
            .await?;

        let updated = store
            .update_permission_description(permission.id, Some(" Read users ".into()))
            .await?;
        assert_eq!(updated.description.as_deref(), Some("Read users"));

        let missing = store.update_permission_description(42, None).await;
        assert_eq!(missing, Err(StoreError::not_found("permission", 42)));
        Ok(())
    }

    #[tokio::test]
    async fn delete_refused_while_granted() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let permission = store
            .create_permission(NewPermission::new("READ_USER", "USER", "READ"))
            .await?;
        let role = store
            .create_role(NewRole::new("ROLE_READER").with_permissions([permission.id]))
            .await?;

        let result = store.delete_permission(permission.id).await;
        assert_eq!(result, Err(StoreError::in_use("permission", permission.id)));

        store.delete_role(role.id).await?;
        store.delete_permission(permission.id).await?;
        assert!(store.find_permission_by_id(permission.id).await?.is_none());
        Ok(())
    }
}
