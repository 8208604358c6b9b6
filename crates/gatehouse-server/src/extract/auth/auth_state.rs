//! Verified principal extractor.
//!
//! ```rust,ignore
//! use gatehouse_server::extract::AuthState;
//!
//! async fn protected_handler(auth_state: AuthState) -> String {
//!     format!("Hello, {}", auth_state.email)
//! }
//!
//! async fn optional_handler(auth_state: Option<AuthState>) -> String {
//!     match auth_state {
//!         Some(auth) => format!("Hello, {}", auth.email),
//!         None => "Hello, anonymous".to_string(),
//!     }
//! }
//! ```

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use derive_more::Deref;

use super::{AuthClaims, AuthHeader};
use crate::handler::{Error, Result};
use crate::service::SessionKeys;

/// Principal decoded from a verified bearer token.
///
/// Dereferences to [`AuthClaims`]. Optional extraction (`Option<AuthState>`)
/// yields `None` only when no `Authorization` header was sent; a header that
/// is present but invalid is still rejected.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Creates a new [`AuthState`] from verified claims.
    #[inline]
    #[must_use]
    pub const fn from_verified_claims(auth_claims: AuthClaims) -> Self {
        Self(auth_claims)
    }

    /// Returns the claims.
    #[inline]
    pub fn into_claims(self) -> AuthClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let auth_state = Self::from_verified_claims(auth_header.into_auth_claims());

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }

        <Self as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
