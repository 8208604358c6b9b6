//! User role assignment handlers (`/api/users`).

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use gatehouse_store::model::User;
use gatehouse_store::query::{RoleRepository, UserRepository};
use gatehouse_store::{StoreClient, StoreError};

use super::request::{AssignRolesRequest, UserPathParams};
use super::response::UserResponse;
use crate::authorize;
use crate::extract::{Caller, Json, Path, Permission, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for user handlers.
const TRACING_TARGET: &str = "gatehouse_server::handler::users";

/// Reports missing users and roles the way role assignment describes them.
fn assignment_error(error: StoreError) -> Error<'static> {
    match error {
        StoreError::NotFound { entity: "user", .. } => ErrorKind::NotFound
            .with_message("User not found")
            .with_resource("user"),
        StoreError::NotFound { entity: "role", id } => ErrorKind::NotFound
            .with_message(format!("Role not found: {id}"))
            .with_resource("role"),
        other => other.into(),
    }
}

/// Builds the response with the names of the user's roles.
async fn user_response(store: &StoreClient, user: User) -> Result<UserResponse> {
    let role_ids: Vec<i64> = user.role_ids.iter().copied().collect();
    let roles = store
        .find_roles_by_ids(&role_ids)
        .await?
        .into_iter()
        .map(|role| role.name)
        .collect();

    Ok(UserResponse::from_model(user, roles))
}

/// Assigns roles to a user, keeping the roles it already holds.
#[tracing::instrument(skip_all)]
async fn assign_roles(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<AssignRolesRequest>,
) -> Result<Json<UserResponse>> {
    authorize!(caller, Permission::AssignRoles);

    let user = store
        .assign_user_roles(path_params.user_id, &request.role_ids)
        .await
        .map_err(assignment_error)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        assigned = request.role_ids.len(),
        assigned_by = %caller.audit_id(),
        "roles assigned to user"
    );

    Ok(Json(user_response(&store, user).await?))
}

/// Removes roles from a user; ids the user does not hold are ignored.
#[tracing::instrument(skip_all)]
async fn remove_roles(
    State(store): State<StoreClient>,
    caller: Caller,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<AssignRolesRequest>,
) -> Result<Json<UserResponse>> {
    authorize!(caller, Permission::AssignRoles);

    let user = store
        .remove_user_roles(path_params.user_id, &request.role_ids)
        .await
        .map_err(assignment_error)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        removed = request.role_ids.len(),
        removed_by = %caller.audit_id(),
        "roles removed from user"
    );

    Ok(Json(user_response(&store, user).await?))
}

/// Returns a [`Router`] with the user management routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route(
        "/api/users/{userId}/roles",
        post(assign_roles).delete(remove_roles),
    )
}
