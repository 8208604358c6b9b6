//! Role management handlers (`/api/roles`).

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use gatehouse_store::model::{NewRole, Role, UpdateRole};
use gatehouse_store::query::{PermissionRepository, RoleRepository};
use gatehouse_store::{StoreClient, StoreError};

use super::request::{
    AssignRolesRequest, CreateRoleRequest, Normalized, OptionNormalized, RoleNamePathParams,
    RolePathParams, UpdateRoleRequest,
};
use super::response::RoleResponse;
use crate::authorize;
use crate::extract::{Caller, Json, Path, Permission, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for role handlers.
const TRACING_TARGET: &str = "gatehouse_server::handler::roles";

/// Reports a missing permission id the way role writes describe it.
fn missing_permission(error: StoreError) -> Error<'static> {
    match error {
        StoreError::NotFound {
            entity: "permission",
            id,
        } => ErrorKind::NotFound
            .with_message(format!("Permission not found: {id}"))
            .with_resource("permission"),
        other => other.into(),
    }
}

/// Loads the permissions granted by a role and builds its response.
async fn role_response(store: &StoreClient, role: Role) -> Result<RoleResponse> {
    let permission_ids: Vec<i64> = role.permission_ids.iter().copied().collect();
    let permissions = store.find_permissions_by_ids(&permission_ids).await?;
    Ok(RoleResponse::from_model(role, permissions))
}

async fn role_responses(store: &StoreClient, roles: Vec<Role>) -> Result<Vec<RoleResponse>> {
    let mut responses = Vec::with_capacity(roles.len());
    for role in roles {
        responses.push(role_response(store, role).await?);
    }
    Ok(responses)
}

/// Creates an active role granting the listed permissions.
#[tracing::instrument(skip_all)]
async fn create_role(
    State(store): State<StoreClient>,
    caller: Caller,
    ValidateJson(request): ValidateJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>)> {
    authorize!(caller, Permission::CreateRole);

    let name = request.name.normalized_string();
    if store.role_name_exists(&name).await? {
        return Err(ErrorKind::BadRequest
            .with_message(format!("Role already exists: {name}"))
            .with_resource("role"));
    }

    let mut new_role = NewRole::new(name).with_permissions(request.permission_ids);
    new_role.description = request.description.normalized_option();
    let role = store.create_role(new_role).await.map_err(missing_permission)?;

    tracing::info!(
        target: TRACING_TARGET,
        role_id = role.id,
        name = %role.name,
        created_by = %caller.audit_id(),
        "role created"
    );

    let response = role_response(&store, role).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_roles(
    State(store): State<StoreClient>,
    caller: Caller,
) -> Result<Json<Vec<RoleResponse>>> {
    authorize!(caller, Permission::ReadRole);

    let roles = store.list_roles().await?;
    Ok(Json(role_responses(&store, roles).await?))
}

async fn list_active_roles(
    State(store): State<StoreClient>,
    caller: Caller,
) -> Result<Json<Vec<RoleResponse>>> {
    authorize!(caller, Permission::ReadRole);

    let roles = store.list_active_roles().await?;
    Ok(Json(role_responses(&store, roles).await?))
}

async fn get_role(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RolePathParams>,
) -> Result<Json<RoleResponse>> {
    authorize!(caller, Permission::ReadRole);

    let role = store
        .find_role_by_id(path_params.role_id)
        .await?
        .ok_or_else(|| StoreError::not_found("role", path_params.role_id))?;

    Ok(Json(role_response(&store, role).await?))
}

async fn get_role_by_name(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RoleNamePathParams>,
) -> Result<Json<RoleResponse>> {
    authorize!(caller, Permission::ReadRole);

    let role = store
        .find_role_by_name(&path_params.name)
        .await?
        .ok_or_else(|| {
            ErrorKind::NotFound
                .with_message(format!("Role not found: {}", path_params.name))
                .with_resource("role")
        })?;

    Ok(Json(role_response(&store, role).await?))
}

/// Updates the description and/or active flag of a role.
#[tracing::instrument(skip_all)]
async fn update_role(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RolePathParams>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>> {
    authorize!(caller, Permission::UpdateRole);

    let updates = UpdateRole {
        description: request.description,
        active: request.active,
    };
    let role = store.update_role(path_params.role_id, updates).await?;

    tracing::info!(
        target: TRACING_TARGET,
        role_id = role.id,
        active = role.active,
        "role updated"
    );

    Ok(Json(role_response(&store, role).await?))
}

/// Grants additional permissions to a role.
#[tracing::instrument(skip_all)]
async fn add_permissions(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RolePathParams>,
    ValidateJson(request): ValidateJson<AssignRolesRequest>,
) -> Result<Json<RoleResponse>> {
    authorize!(caller, Permission::AssignPermissions);

    let role = store
        .add_role_permissions(path_params.role_id, &request.role_ids)
        .await
        .map_err(missing_permission)?;

    tracing::info!(
        target: TRACING_TARGET,
        role_id = role.id,
        added = request.role_ids.len(),
        "permissions granted to role"
    );

    Ok(Json(role_response(&store, role).await?))
}

/// Revokes permissions from a role.
#[tracing::instrument(skip_all)]
async fn remove_permissions(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RolePathParams>,
    ValidateJson(request): ValidateJson<AssignRolesRequest>,
) -> Result<Json<RoleResponse>> {
    authorize!(caller, Permission::AssignPermissions);

    let role = store
        .remove_role_permissions(path_params.role_id, &request.role_ids)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        role_id = role.id,
        removed = request.role_ids.len(),
        "permissions revoked from role"
    );

    Ok(Json(role_response(&store, role).await?))
}

/// Deletes a role that no user holds.
#[tracing::instrument(skip_all)]
async fn delete_role(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<RolePathParams>,
) -> Result<StatusCode> {
    authorize!(caller, Permission::DeleteRole);

    store.delete_role(path_params.role_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        role_id = path_params.role_id,
        deleted_by = %caller.audit_id(),
        "role deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with the role management routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/roles", post(create_role).get(list_roles))
        .route("/api/roles/active", get(list_active_roles))
        .route("/api/roles/name/{name}", get(get_role_by_name))
        .route(
            "/api/roles/{roleId}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .route(
            "/api/roles/{roleId}/permissions",
            post(add_permissions).delete(remove_permissions),
        )
}
