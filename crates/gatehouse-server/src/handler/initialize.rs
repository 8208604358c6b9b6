//! Bootstrap of the built-in permissions, the admin role and the admin user.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use gatehouse_store::StoreClient;
use gatehouse_store::model::{NewPermission, NewRole, NewUser};
use gatehouse_store::query::{PermissionRepository, RoleRepository, UserRepository};
use strum::IntoEnumIterator;

use super::response::MessageResponse;
use crate::TRACING_TARGET_BOOTSTRAP;
use crate::extract::{Json, Permission};
use crate::handler::Result;
use crate::service::{PasswordHasher, ServiceState};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";
const ADMIN_FULL_NAME: &str = "System Administrator";
const ADMIN_ROLE: &str = "ROLE_ADMIN";
const ADMIN_ROLE_DESCRIPTION: &str = "Administrator role with full access to all resources";

/// Creates the catalog permissions that do not exist yet and returns the ids of all of them.
async fn ensure_catalog_permissions(store: &StoreClient) -> Result<Vec<i64>> {
    let mut permission_ids = Vec::new();

    for permission in Permission::iter() {
        let row = match store.find_permission_by_name(permission.name()).await? {
            Some(row) => row,
            None => {
                let new_permission =
                    NewPermission::new(permission.name(), permission.resource(), permission.action())
                        .with_description(permission.description());
                let row = store.create_permission(new_permission).await?;

                tracing::debug!(
                    target: TRACING_TARGET_BOOTSTRAP,
                    permission = %row.name,
                    "permission created"
                );

                row
            }
        };

        permission_ids.push(row.id);
    }

    Ok(permission_ids)
}

/// Seeds the admin account unless it already exists.
#[tracing::instrument(skip_all)]
async fn initialize_admin(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if store.email_exists(ADMIN_EMAIL).await? {
        tracing::info!(target: TRACING_TARGET_BOOTSTRAP, "admin user already exists");

        let response = MessageResponse::new("Data already initialized. Admin user exists.");
        return Ok((StatusCode::OK, Json(response)));
    }

    let permission_ids = ensure_catalog_permissions(&store).await?;

    let admin_role = NewRole::new(ADMIN_ROLE)
        .with_description(ADMIN_ROLE_DESCRIPTION)
        .with_permissions(permission_ids.iter().copied());
    let admin_role = store.ensure_role(admin_role).await?;
    let admin_role = store
        .add_role_permissions(admin_role.id, &permission_ids)
        .await?;

    let password_hash = password_hasher.hash_password(ADMIN_PASSWORD)?;
    let admin = NewUser::new(ADMIN_EMAIL, password_hash, ADMIN_FULL_NAME).with_roles([admin_role.id]);
    let admin = store.create_user(admin).await?;

    tracing::info!(
        target: TRACING_TARGET_BOOTSTRAP,
        user_id = admin.id,
        role_id = admin_role.id,
        permissions = permission_ids.len(),
        "admin data initialized"
    );

    let response = MessageResponse::new(format!(
        "Data initialization completed successfully! Admin credentials - Email: {ADMIN_EMAIL}, Password: {ADMIN_PASSWORD}"
    ));
    Ok((StatusCode::CREATED, Json(response)))
}

async fn reset_info() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "To reset data, manually clear the database and call /init/admin again",
    ))
}

/// Returns a [`Router`] with the bootstrap routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/init/admin", post(initialize_admin))
        .route("/init/reset", post(reset_info))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn bootstrap_is_idempotent() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;

        let response = server.post("/init/admin").await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "message": "Data initialization completed successfully! Admin credentials - Email: admin@example.com, Password: admin123"
        }));

        let response = server.post("/init/admin").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Data already initialized. Admin user exists." }));

        assert_eq!(state.store.list_permissions().await?.len(), 17);
        assert_eq!(state.store.list_roles().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn admin_holds_every_permission() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;
        state
            .store
            .create_permission(NewPermission::new("READ_PRODUCTS", "PRODUCT", "READ"))
            .await?;

        server.post("/init/admin").await.assert_status(StatusCode::CREATED);

        let admin = state
            .store
            .find_user_by_email(ADMIN_EMAIL)
            .await?
            .ok_or_else(|| anyhow::anyhow!("admin user missing"))?;
        let grants = state.store.find_user_grants(admin.id).await?;
        assert_eq!(grants.roles, vec![ADMIN_ROLE]);
        assert_eq!(grants.permissions.len(), 17);

        state.password_hasher.verify_password(ADMIN_PASSWORD, &admin.password_hash)?;
        Ok(())
    }

    #[tokio::test]
    async fn reset_explains_manual_steps() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server.post("/init/reset").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "To reset data, manually clear the database and call /init/admin again"
        }));
        Ok(())
    }
}
