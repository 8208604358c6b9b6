//! Permission management handlers (`/api/permissions`).

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use gatehouse_store::model::NewPermission;
use gatehouse_store::query::PermissionRepository;
use gatehouse_store::{StoreClient, StoreError};

use super::request::{
    CreatePermissionRequest, Normalized, OptionNormalized, PermissionPathParams,
    ResourcePathParams, UpdatePermissionQuery,
};
use super::response::PermissionResponse;
use crate::authorize;
use crate::extract::{Caller, Json, Path, Permission, Query, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for permission handlers.
const TRACING_TARGET: &str = "gatehouse_server::handler::permissions";

fn permission_responses(
    permissions: Vec<gatehouse_store::model::Permission>,
) -> Vec<PermissionResponse> {
    permissions
        .into_iter()
        .map(PermissionResponse::from_model)
        .collect()
}

/// Creates a permission with a unique name.
#[tracing::instrument(skip_all)]
async fn create_permission(
    State(store): State<StoreClient>,
    caller: Caller,
    ValidateJson(request): ValidateJson<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>)> {
    authorize!(caller, Permission::CreatePermission);

    let name = request.name.normalized_string();
    if store.permission_name_exists(&name).await? {
        return Err(ErrorKind::BadRequest
            .with_message(format!("Permission already exists: {name}"))
            .with_resource("permission"));
    }

    let mut new_permission = NewPermission::new(
        name,
        request.resource.normalized_string(),
        request.action.normalized_string(),
    );
    new_permission.description = request.description.normalized_option();
    let permission = store.create_permission(new_permission).await?;

    tracing::info!(
        target: TRACING_TARGET,
        permission_id = permission.id,
        name = %permission.name,
        created_by = %caller.audit_id(),
        "permission created"
    );

    Ok((
        StatusCode::CREATED,
        Json(PermissionResponse::from_model(permission)),
    ))
}

async fn list_permissions(
    State(store): State<StoreClient>,
    caller: Caller,
) -> Result<Json<Vec<PermissionResponse>>> {
    authorize!(caller, Permission::ReadPermission);

    let permissions = store.list_permissions().await?;
    Ok(Json(permission_responses(permissions)))
}

async fn get_permission(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<PermissionPathParams>,
) -> Result<Json<PermissionResponse>> {
    authorize!(caller, Permission::ReadPermission);

    let permission = store
        .find_permission_by_id(path_params.id)
        .await?
        .ok_or_else(|| StoreError::not_found("permission", path_params.id))?;

    Ok(Json(PermissionResponse::from_model(permission)))
}

async fn list_permissions_by_resource(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<ResourcePathParams>,
) -> Result<Json<Vec<PermissionResponse>>> {
    authorize!(caller, Permission::ReadPermission);

    let permissions = store
        .list_permissions_by_resource(&path_params.resource)
        .await?;
    Ok(Json(permission_responses(permissions)))
}

/// Replaces the description of a permission.
#[tracing::instrument(skip_all)]
async fn update_permission(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<PermissionPathParams>,
    Query(query): Query<UpdatePermissionQuery>,
) -> Result<Json<PermissionResponse>> {
    authorize!(caller, Permission::UpdatePermission);

    let permission = store
        .update_permission_description(path_params.id, Some(query.description))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        permission_id = permission.id,
        "permission updated"
    );

    Ok(Json(PermissionResponse::from_model(permission)))
}

/// Deletes a permission that no role grants.
#[tracing::instrument(skip_all)]
async fn delete_permission(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<PermissionPathParams>,
) -> Result<StatusCode> {
    authorize!(caller, Permission::DeletePermission);

    store.delete_permission(path_params.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        permission_id = path_params.id,
        deleted_by = %caller.audit_id(),
        "permission deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with the permission management routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/api/permissions",
            post(create_permission).get(list_permissions),
        )
        .route(
            "/api/permissions/resource/{resource}",
            get(list_permissions_by_resource),
        )
        .route(
            "/api/permissions/{id}",
            get(get_permission)
                .put(update_permission)
                .delete(delete_permission),
        )
}

#[cfg(test)]
mod tests {
    use gatehouse_store::model::NewRole;
    use gatehouse_store::query::RoleRepository;
    use serde_json::json;

    use super::*;
    use crate::extract::X_USER_PERMISSIONS;
    use crate::handler::test::create_test_server_with_router;

    const ALL_PERMISSION_PERMISSIONS: &str =
        "CREATE_PERMISSION,READ_PERMISSION,UPDATE_PERMISSION,DELETE_PERMISSION";

    #[tokio::test]
    async fn create_and_list_by_resource() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        for (name, resource) in [("READ_PRODUCTS", "PRODUCT"), ("READ_USER", "USER")] {
            server
                .post("/api/permissions")
                .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
                .json(&json!({ "name": name, "resource": resource, "action": "READ" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/permissions/resource/PRODUCT")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await;
        response.assert_status_ok();
        let permissions = response.json::<Vec<PermissionResponse>>();
        assert_eq!(permissions.len(), 1);
        assert_eq!(permissions[0].name, "READ_PRODUCTS");

        let response = server
            .get("/api/permissions")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await;
        assert_eq!(response.json::<Vec<PermissionResponse>>().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;
        let body = json!({ "name": "READ_PRODUCTS", "resource": "PRODUCT", "action": "READ" });

        server
            .post("/api/permissions")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/permissions")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .json(&body)
            .await;
        response.assert_status_bad_request();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Permission already exists: READ_PRODUCTS");
        Ok(())
    }

    #[tokio::test]
    async fn update_description_through_query() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;
        let permission = state
            .store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await?;

        let response = server
            .put(&format!("/api/permissions/{}", permission.id))
            .add_query_param("description", "View products")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await;
        response.assert_status_ok();
        let updated = response.json::<PermissionResponse>();
        assert_eq!(updated.description.as_deref(), Some("View products"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_permission_is_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .get("/api/permissions/42")
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await;
        response.assert_status_not_found();
        let error: serde_json::Value = response.json();
        assert_eq!(error["message"], "Permission not found with id: 42");
        Ok(())
    }

    #[tokio::test]
    async fn delete_refused_while_granted() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;
        let permission = state
            .store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await?;
        let role = state
            .store
            .create_role(NewRole::new("ROLE_VIEWER").with_permissions([permission.id]))
            .await?;
        let path = format!("/api/permissions/{}", permission.id);

        let response = server
            .delete(&path)
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await;
        response.assert_status_bad_request();
        let error: serde_json::Value = response.json();
        assert_eq!(
            error["message"],
            "Cannot delete permission that is assigned to roles"
        );

        state.store.delete_role(role.id).await?;
        server
            .delete(&path)
            .add_header(X_USER_PERMISSIONS, ALL_PERMISSION_PERMISSIONS)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        Ok(())
    }

    #[tokio::test]
    async fn read_requires_read_permission() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .get("/api/permissions")
            .add_header(X_USER_PERMISSIONS, "CREATE_PERMISSION")
            .await;
        response.assert_status_forbidden();
        Ok(())
    }
}
