//! The identity a request acts as, and the permission gate.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use super::{AuthResult, AuthState, Permission};
use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::Error;
use crate::service::SessionKeys;

/// Header carrying the user id set by a trusted proxy.
pub const X_USER_ID: &str = "x-user-id";
/// Header carrying the user email set by a trusted proxy.
pub const X_USER_EMAIL: &str = "x-user-email";
/// Header carrying the user display name set by a trusted proxy.
pub const X_USER_NAME: &str = "x-user-name";
/// Header carrying comma-separated role names set by a trusted proxy.
pub const X_USER_ROLES: &str = "x-user-roles";
/// Header carrying comma-separated permission names set by a trusted proxy.
pub const X_USER_PERMISSIONS: &str = "x-user-permissions";

/// Audit value recorded when no principal is known.
const SYSTEM_ACTOR: &str = "system";

/// Whether identity headers from an upstream proxy are trusted.
///
/// Installed as a request extension per router; when the extension is absent
/// the headers are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardedIdentity {
    pub trusted: bool,
}

impl ForwardedIdentity {
    /// Trust `X-User-*` headers.
    pub const TRUSTED: Self = Self { trusted: true };
    /// Ignore `X-User-*` headers.
    pub const IGNORED: Self = Self { trusted: false };
}

impl Default for ForwardedIdentity {
    fn default() -> Self {
        Self::TRUSTED
    }
}

/// Where the caller identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerSource {
    /// A verified bearer token.
    Token,
    /// Identity headers set by a trusted proxy.
    ForwardedHeaders,
    /// Neither; the caller holds no permissions.
    Anonymous,
}

/// The identity a request acts as.
///
/// Resolved from the verified token principal first, then from trusted
/// forwarded headers, and otherwise anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub source: CallerSource,
}

impl Caller {
    /// A caller without identity or permissions.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            email: None,
            full_name: None,
            roles: Vec::new(),
            permissions: Vec::new(),
            source: CallerSource::Anonymous,
        }
    }

    /// Builds the caller from a verified token principal.
    pub fn from_auth_state(auth_state: &AuthState) -> Self {
        Self {
            user_id: Some(auth_state.user_id.to_string()),
            email: Some(auth_state.email.clone()),
            full_name: Some(auth_state.full_name.clone()),
            roles: auth_state.roles().into_iter().map(str::to_owned).collect(),
            permissions: auth_state
                .permissions()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            source: CallerSource::Token,
        }
    }

    /// Builds the caller from `X-User-*` headers.
    ///
    /// Returns an anonymous caller when none of the headers is present.
    pub fn from_forwarded_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        let list = |name: &str| {
            header(name)
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default()
        };

        let caller = Self {
            user_id: header(X_USER_ID),
            email: header(X_USER_EMAIL),
            full_name: header(X_USER_NAME),
            roles: list(X_USER_ROLES),
            permissions: list(X_USER_PERMISSIONS),
            source: CallerSource::ForwardedHeaders,
        };

        if caller.user_id.is_none()
            && caller.email.is_none()
            && caller.roles.is_empty()
            && caller.permissions.is_empty()
        {
            return Self::anonymous();
        }

        caller
    }

    /// Returns `true` when the caller carries a user id.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns `true` if the caller holds the permission.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|p| p == permission.name())
    }

    /// Returns `true` if the caller holds the role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Value recorded in `created_by`/`updated_by` columns.
    pub fn audit_id(&self) -> String {
        self.user_id
            .clone()
            .unwrap_or_else(|| SYSTEM_ACTOR.to_owned())
    }

    /// Checks whether the caller may perform an operation guarded by `permission`.
    pub fn authorize(&self, permission: Permission) -> AuthResult {
        if self.permissions.is_empty() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = self.user_id.as_deref().unwrap_or("unknown"),
                required = permission.name(),
                source = ?self.source,
                "access denied: caller holds no permissions"
            );

            return AuthResult::denied("Access denied: No permissions found");
        }

        if !self.has_permission(permission) {
            let email = self.email.as_deref().unwrap_or("unknown");
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                email = %email,
                required = permission.name(),
                source = ?self.source,
                "access denied: missing permission"
            );

            return AuthResult::denied(format!(
                "Access denied: User '{}' does not have permission '{}'",
                email,
                permission.name()
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = self.user_id.as_deref().unwrap_or("unknown"),
            permission = permission.name(),
            "access granted"
        );

        AuthResult::granted()
    }

    /// Renders the `/user-info` text.
    pub fn describe(&self) -> String {
        if !self.is_authenticated() {
            return "User Info - Not authenticated".to_owned();
        }

        format!(
            "User Info - ID: {}, Email: {}, Name: {}, Roles: {}, Permissions: {}",
            self.user_id.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default(),
            self.full_name.as_deref().unwrap_or_default(),
            self.roles.join(", "),
            self.permissions.join(", "),
        )
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) =
            <AuthState as OptionalFromRequestParts<S>>::from_request_parts(parts, state).await?
        {
            return Ok(Self::from_auth_state(&auth_state));
        }

        let forwarded = parts
            .extensions
            .get::<ForwardedIdentity>()
            .copied()
            .unwrap_or_default();

        if forwarded.trusted {
            return Ok(Self::from_forwarded_headers(&parts.headers));
        }

        Ok(Self::anonymous())
    }
}
