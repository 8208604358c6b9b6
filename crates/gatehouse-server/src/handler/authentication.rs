//! Registration, login and password handlers of the auth service.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use gatehouse_store::StoreClient;
use gatehouse_store::model::{NewRole, NewUser, User};
use gatehouse_store::query::{RoleRepository, UserRepository};

use super::request::{ChangePasswordRequest, LoginRequest, Normalized, RegisterRequest};
use super::response::{AuthResponse, MessageResponse};
use crate::extract::{AuthClaims, Caller, Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SessionKeys};

/// Tracing target for authentication handlers.
const TRACING_TARGET: &str = "gatehouse_server::handler::authentication";

/// Role every self-registered user receives.
const DEFAULT_ROLE: &str = "ROLE_USER";

/// Signs a token carrying the user's current roles and permissions.
async fn issue_token(
    store: &StoreClient,
    session_keys: &SessionKeys,
    user: &User,
    message: &str,
) -> Result<AuthResponse> {
    let grants = store.find_user_grants(user.id).await?;
    let auth_claims = AuthClaims::new(user, &grants, session_keys.token_lifetime());
    let token = auth_claims.encode(session_keys)?;

    tracing::debug!(
        target: TRACING_TARGET,
        token_id = %auth_claims.token_id,
        user_id = user.id,
        roles = grants.roles.len(),
        permissions = grants.permissions.len(),
        "token issued"
    );

    Ok(AuthResponse {
        token,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        roles: grants.roles.join(","),
        message: message.to_owned(),
    })
}

/// Creates an account with the default role and returns a token for it.
#[tracing::instrument(skip_all)]
async fn register(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let email = request.email.normalized_string().to_lowercase();

    tracing::trace!(target: TRACING_TARGET, email = %email, "registration attempt");

    if store.email_exists(&email).await? {
        tracing::warn!(target: TRACING_TARGET, email = %email, "email already registered");
        return Err(ErrorKind::BadRequest
            .with_message("Email already registered")
            .with_resource("user"));
    }

    let default_role = NewRole::new(DEFAULT_ROLE).with_description("Default user role");
    let default_role = store.ensure_role(default_role).await?;

    let password_hash = password_hasher.hash_password(&request.password)?;
    let new_user = NewUser::new(&email, password_hash, request.full_name.normalized_string())
        .with_roles([default_role.id]);
    let user = store.create_user(new_user).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        email = %user.email,
        "user registered"
    );

    let response = issue_token(&store, &session_keys, &user, "User registered successfully").await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Verifies credentials and returns a fresh token.
#[tracing::instrument(skip_all)]
async fn login(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = request.email.normalized_string().to_lowercase();

    tracing::trace!(target: TRACING_TARGET, email = %email, "login attempt");

    let Some(user) = store.find_user_by_email(&email).await? else {
        // Keep the timing of unknown emails close to that of wrong passwords.
        password_hasher.verify_dummy_password(&request.password);

        tracing::warn!(target: TRACING_TARGET, email = %email, "login failed: unknown email");
        return Err(ErrorKind::Unauthorized
            .with_message("Invalid email or password")
            .with_resource("authentication"));
    };

    if let Err(error) = password_hasher.verify_password(&request.password, &user.password_hash) {
        tracing::warn!(target: TRACING_TARGET, user_id = user.id, "login failed: wrong password");
        return Err(error);
    }

    if !user.enabled {
        tracing::warn!(target: TRACING_TARGET, user_id = user.id, "login failed: account disabled");
        return Err(ErrorKind::Unauthorized
            .with_message("Account is disabled")
            .with_resource("authentication"));
    }

    if !user.account_non_locked {
        tracing::warn!(target: TRACING_TARGET, user_id = user.id, "login failed: account locked");
        return Err(ErrorKind::Unauthorized
            .with_message("Account is locked")
            .with_resource("authentication"));
    }

    let user = store.record_login(user.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        email = %user.email,
        "login successful"
    );

    let response = issue_token(&store, &session_keys, &user, "Login successful").await?;
    Ok(Json(response))
}

/// Replaces the caller's password after checking the current one.
#[tracing::instrument(skip_all)]
async fn change_password(
    State(store): State<StoreClient>,
    State(password_hasher): State<PasswordHasher>,
    caller: Caller,
    ValidateJson(request): ValidateJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let Some(email) = caller.email.as_deref() else {
        return Err(ErrorKind::Unauthorized
            .with_message("User not authenticated")
            .with_resource("authentication"));
    };

    let user = store.find_user_by_email(email).await?.ok_or_else(|| {
        ErrorKind::BadRequest
            .with_message("User not found")
            .with_resource("user")
    })?;

    if let Err(error) = password_hasher.verify_password(&request.current_password, &user.password_hash) {
        if error.kind() != ErrorKind::Unauthorized {
            return Err(error);
        }

        tracing::warn!(target: TRACING_TARGET, user_id = user.id, "current password mismatch");
        return Err(ErrorKind::BadRequest
            .with_message("Current password is incorrect")
            .with_resource("user"));
    }

    let password_hash = password_hasher.hash_password(&request.new_password)?;
    store.update_password(user.id, password_hash).await?;

    tracing::info!(target: TRACING_TARGET, user_id = user.id, "password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

async fn health() -> &'static str {
    "Auth Service is running"
}

/// Describes the identity the request acts as.
pub(super) async fn user_info(caller: Caller) -> String {
    caller.describe()
}

/// Returns a [`Router`] with the authentication routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
        .route("/health", get(health))
        .route("/user-info", get(user_info))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::extract::{AuthClaims, X_USER_EMAIL, X_USER_ID, X_USER_PERMISSIONS};
    use crate::handler::test::create_test_server_with_router;

    fn register_body(email: &str) -> serde_json::Value {
        json!({
            "email": email,
            "password": "secret1",
            "fullName": "Jane Doe",
        })
    }

    #[tokio::test]
    async fn register_returns_token_with_default_role() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;

        let response = server.post("/register").json(&register_body("Jane@Example.com")).await;
        response.assert_status(StatusCode::CREATED);

        let body = response.json::<AuthResponse>();
        assert_eq!(body.email, "jane@example.com");
        assert_eq!(body.full_name, "Jane Doe");
        assert_eq!(body.roles, "ROLE_USER");
        assert_eq!(body.message, "User registered successfully");

        let claims = AuthClaims::decode(&body.token, &state.session_keys)?;
        assert_eq!(claims.roles(), vec!["ROLE_USER"]);
        assert!(claims.permissions().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        server
            .post("/register")
            .json(&register_body("jane@example.com"))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/register").json(&register_body("jane@example.com")).await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Email already registered");
        Ok(())
    }

    #[tokio::test]
    async fn register_validates_fields() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/register")
            .json(&json!({ "email": "not-an-email", "password": "123", "fullName": " " }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn login_with_valid_credentials() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;
        server.post("/register").json(&register_body("jane@example.com")).await;

        let response = server
            .post("/login")
            .json(&json!({ "email": "jane@example.com", "password": "secret1" }))
            .await;
        response.assert_status_ok();
        let body = response.json::<AuthResponse>();
        assert_eq!(body.message, "Login successful");

        let user = state.store.find_user_by_email("jane@example.com").await?;
        assert!(user.is_some_and(|u| u.last_login_at.is_some()));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;
        server.post("/register").json(&register_body("jane@example.com")).await;

        for (email, password) in [("jane@example.com", "wrong1"), ("nobody@example.com", "secret1")] {
            let response = server
                .post("/login")
                .json(&json!({ "email": email, "password": password }))
                .await;
            response.assert_status_unauthorized();
            let body: serde_json::Value = response.json();
            assert_eq!(body["message"], "Invalid email or password");
        }
        Ok(())
    }

    #[tokio::test]
    async fn disabled_and_locked_accounts_are_rejected() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_router(|_| routes()).await?;
        let password_hash = state.password_hasher.hash_password("secret1")?;

        let mut disabled = NewUser::new("off@example.com", password_hash.clone(), "Off");
        disabled.enabled = false;
        state.store.create_user(disabled).await?;

        let mut locked = NewUser::new("locked@example.com", password_hash, "Locked");
        locked.account_non_locked = false;
        state.store.create_user(locked).await?;

        let response = server
            .post("/login")
            .json(&json!({ "email": "off@example.com", "password": "secret1" }))
            .await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Account is disabled");

        let response = server
            .post("/login")
            .json(&json!({ "email": "locked@example.com", "password": "secret1" }))
            .await;
        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Account is locked");
        Ok(())
    }

    #[tokio::test]
    async fn change_password_flow() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;
        let token = server
            .post("/register")
            .json(&register_body("jane@example.com"))
            .await
            .json::<AuthResponse>()
            .token;

        let response = server
            .post("/change-password")
            .authorization_bearer(&token)
            .json(&json!({ "currentPassword": "wrong1", "newPassword": "secret2" }))
            .await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Current password is incorrect");

        let response = server
            .post("/change-password")
            .authorization_bearer(&token)
            .json(&json!({ "currentPassword": "secret1", "newPassword": "secret2" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Password changed successfully" }));

        server
            .post("/login")
            .json(&json!({ "email": "jane@example.com", "password": "secret2" }))
            .await
            .assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn change_password_for_unknown_user() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        let response = server
            .post("/change-password")
            .add_header(X_USER_EMAIL, "ghost@example.com")
            .json(&json!({ "currentPassword": "secret1", "newPassword": "secret2" }))
            .await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "User not found");
        Ok(())
    }

    #[tokio::test]
    async fn health_and_user_info() -> anyhow::Result<()> {
        let (server, _) = create_test_server_with_router(|_| routes()).await?;

        server.get("/health").await.assert_text("Auth Service is running");
        server
            .get("/user-info")
            .await
            .assert_text("User Info - Not authenticated");

        let response = server
            .get("/user-info")
            .add_header(X_USER_ID, "5")
            .add_header(X_USER_EMAIL, "jane@example.com")
            .add_header(X_USER_PERMISSIONS, "READ_PRODUCTS")
            .await;
        response.assert_text("User Info - ID: 5, Email: jane@example.com, Name: , Roles: , Permissions: READ_PRODUCTS");
        Ok(())
    }
}
