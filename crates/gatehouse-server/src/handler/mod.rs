//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! The auth service and the product service are separate routers sharing one
//! [`ServiceState`]; [`service_routes`] picks the one configured for the process.
//!
//! ```rust,ignore
//! use gatehouse_server::handler::service_routes;
//! use gatehouse_server::service::{ServiceConfig, ServiceState};
//!
//! let state = ServiceState::from_config(&config).await?;
//! let router = service_routes(&state).with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod initialize;
mod monitors;
mod permissions;
mod products;
pub mod request;
pub mod response;
mod roles;
mod users;

use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub(crate) use crate::handler::response::ErrorResponse;
use crate::extract::ForwardedIdentity;
use crate::middleware::require_authentication;
use crate::service::{ServiceKind, ServiceState};

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns the per-router trust setting for `X-User-*` headers.
fn forwarded_identity(state: &ServiceState) -> ForwardedIdentity {
    if state.service_config.trust_forwarded_headers {
        ForwardedIdentity::TRUSTED
    } else {
        ForwardedIdentity::IGNORED
    }
}

/// Returns a [`Router`] with all auth service routes.
///
/// Registration, login, user role assignment, roles and permissions, plus
/// the `/init` bootstrap routes unless they are disabled in the config.
///
/// [`Router`]: axum::routing::Router
pub fn auth_routes(state: &ServiceState) -> Router<ServiceState> {
    let mut router = Router::new()
        .merge(authentication::routes())
        .merge(users::routes())
        .merge(roles::routes())
        .merge(permissions::routes())
        .merge(monitors::routes());

    if !state.service_config.disable_bootstrap {
        router = router.merge(initialize::routes());
    }

    router
        .fallback(handler)
        .layer(Extension(forwarded_identity(state)))
}

/// Returns a [`Router`] with all product service routes.
///
/// Every product route except `/products/health` requires a valid bearer token.
///
/// [`Router`]: axum::routing::Router
pub fn product_routes(state: &ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state.clone(), require_authentication);

    let private_router = products::private_routes().route_layer(require_authentication);
    let public_router = products::public_routes().merge(monitors::routes());

    Router::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(handler)
        .layer(Extension(forwarded_identity(state)))
}

/// Returns the routes of the service configured for this process.
pub fn service_routes(state: &ServiceState) -> Router<ServiceState> {
    match state.service_config.service {
        ServiceKind::Auth => auth_routes(state),
        ServiceKind::Product => product_routes(state),
    }
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum_test::TestServer;
    use gatehouse_store::model::{NewPermission, NewRole, NewUser};
    use gatehouse_store::query::{PermissionRepository, RoleRepository, UserRepository};

    use crate::extract::{AuthClaims, Permission, X_USER_EMAIL, X_USER_PERMISSIONS};
    use crate::handler::service_routes;
    use crate::service::{ServiceConfig, ServiceKind, ServiceState};

    /// Returns a new [`ServiceState`] for the given service.
    pub async fn create_test_state(service: ServiceKind) -> anyhow::Result<ServiceState> {
        let config = ServiceConfig {
            service,
            ..ServiceConfig::default()
        };
        Ok(ServiceState::from_config(&config).await?)
    }

    /// Returns a new [`TestServer`] with the given router and state.
    pub fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let app = router.with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the given router.
    pub async fn create_test_server_with_router(
        router: impl Fn(&ServiceState) -> Router<ServiceState>,
    ) -> anyhow::Result<(TestServer, ServiceState)> {
        let state = create_test_state(ServiceKind::Auth).await?;
        let server = create_test_server_with_state(router(&state), state.clone())?;
        Ok((server, state))
    }

    /// Returns a new [`TestServer`] running the routes of the given service.
    pub async fn create_test_server(
        service: ServiceKind,
    ) -> anyhow::Result<(TestServer, ServiceState)> {
        let state = create_test_state(service).await?;
        let server = create_test_server_with_state(service_routes(&state), state.clone())?;
        Ok((server, state))
    }

    /// Creates a user holding exactly `permissions` and returns a signed token for it.
    pub async fn issue_token(
        state: &ServiceState,
        email: &str,
        permissions: &[Permission],
    ) -> anyhow::Result<String> {
        let mut permission_ids = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let row = match state.store.find_permission_by_name(permission.name()).await? {
                Some(row) => row,
                None => {
                    let new_permission = NewPermission::new(
                        permission.name(),
                        permission.resource(),
                        permission.action(),
                    );
                    state.store.create_permission(new_permission).await?
                }
            };
            permission_ids.push(row.id);
        }

        let new_role = NewRole::new(format!("ROLE_TEST_{email}")).with_permissions(permission_ids);
        let role = state.store.create_role(new_role).await?;

        let new_user = NewUser::new(email, "unused", "Test User").with_roles([role.id]);
        let user = state.store.create_user(new_user).await?;
        let grants = state.store.find_user_grants(user.id).await?;

        let claims = AuthClaims::new(&user, &grants, state.session_keys.token_lifetime());
        Ok(claims.encode(&state.session_keys)?)
    }

    #[tokio::test]
    async fn both_services_start() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Auth).await?;
        assert!(server.is_running());

        let (server, _) = create_test_server(ServiceKind::Product).await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Auth).await?;

        let response = server.get("/does-not-exist").await;
        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_can_be_disabled() -> anyhow::Result<()> {
        let config = ServiceConfig {
            disable_bootstrap: true,
            ..ServiceConfig::default()
        };
        let state = ServiceState::from_config(&config).await?;
        let server = create_test_server_with_state(service_routes(&state), state.clone())?;

        server.post("/init/admin").await.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn forwarded_headers_can_be_ignored() -> anyhow::Result<()> {
        let config = ServiceConfig {
            trust_forwarded_headers: false,
            ..ServiceConfig::default()
        };
        let state = ServiceState::from_config(&config).await?;
        let server = create_test_server_with_state(service_routes(&state), state.clone())?;

        let response = server
            .get("/api/roles")
            .add_header(X_USER_EMAIL, "jane@example.com")
            .add_header(X_USER_PERMISSIONS, "READ_ROLE")
            .await;
        response.assert_status_forbidden();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Access denied: No permissions found");
        Ok(())
    }

    #[tokio::test]
    async fn forwarded_headers_are_trusted_by_default() -> anyhow::Result<()> {
        let (server, _) = create_test_server(ServiceKind::Auth).await?;

        server
            .get("/api/roles")
            .add_header(X_USER_PERMISSIONS, "READ_ROLE")
            .await
            .assert_status_ok();
        Ok(())
    }
}
