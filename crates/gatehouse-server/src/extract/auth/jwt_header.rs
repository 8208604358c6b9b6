//! Bearer token extraction, validation and issuance.
//!
//! ```rust,ignore
//! async fn handler(auth_header: AuthHeader) -> Result<impl IntoResponse> {
//!     let claims = auth_header.as_auth_claims();
//!     Ok(format!("Hello, {}", claims.email))
//! }
//! ```

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use gatehouse_store::model::{User, UserGrants};
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Verified bearer token from the `Authorization` header.
///
/// Extraction checks the HS256 signature against the shared secret and
/// rejects expired tokens. The result is cached in the request extensions.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
}

impl AuthHeader {
    /// Creates a new authentication header from already verified claims.
    #[inline]
    pub const fn new(claims: AuthClaims) -> Self {
        Self {
            auth_claims: claims,
        }
    }

    /// Returns a reference to the JWT claims.
    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    /// Consumes this header and returns the JWT claims.
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }

    fn from_header(
        authorization_header: TypedHeader<Authorization<Bearer>>,
        session_keys: &SessionKeys,
    ) -> Result<Self> {
        let auth_claims = AuthClaims::decode(authorization_header.token(), session_keys)?;
        Ok(Self::new(auth_claims))
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let session_keys = SessionKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let auth_header = Self::from_header(bearer_header, &session_keys)?;
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_context("Missing Authorization header with Bearer token")
                        .with_resource("authentication"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_context("Authorization header must contain a Bearer token")
                        .with_resource("authentication"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_context("Unexpected error during header extraction")
                        .with_resource("authentication"),
                };

                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    kind = %error.kind(),
                    "rejected authorization header"
                );

                Err(error)
            }
        }
    }
}

/// Claims carried by a session token.
///
/// | Claim         | Field         | Description                                  |
/// |---------------|---------------|----------------------------------------------|
/// | `jti`         | `token_id`    | Unique token identifier                      |
/// | `sub`         | `user_id`     | User id, as a decimal string                 |
/// | `email`       | `email`       | Email of the user                            |
/// | `fullName`    | `full_name`   | Display name of the user                     |
/// | `roles`       | -             | Comma-joined role names                      |
/// | `permissions` | -             | Comma-joined distinct permission names       |
/// | `iat`         | `issued_at`   | Issue time, seconds since the epoch          |
/// | `exp`         | `expires_at`  | Expiration time, seconds since the epoch     |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    /// JWT ID.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject (the user id).
    #[serde(rename = "sub", with = "subject")]
    pub user_id: i64,

    pub email: String,
    pub full_name: String,
    roles: String,
    permissions: String,

    /// Issued at.
    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiration time.
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    /// Claims every token must carry.
    const REQUIRED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

    /// Builds the claims for a user and their current grants.
    pub fn new(user: &User, grants: &UserGrants, lifetime: SignedDuration) -> Self {
        let issued_at = Timestamp::now();

        Self {
            token_id: Uuid::new_v4(),
            user_id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            roles: grants.roles.join(","),
            permissions: grants.permissions.join(","),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime).unwrap_or(Timestamp::MAX),
        }
    }

    /// Returns the role names, in the order they were issued.
    pub fn roles(&self) -> Vec<&str> {
        split_claim(&self.roles)
    }

    /// Returns the distinct permission names.
    pub fn permissions(&self) -> Vec<&str> {
        split_claim(&self.permissions)
    }

    /// Returns `true` if the token carries the role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(&role)
    }

    /// Returns `true` if the token carries the permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns `true` once the expiration time has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now()
    }

    /// Signs the claims into a compact HS256 token.
    pub fn encode(&self, session_keys: &SessionKeys) -> Result<String> {
        let header = Header::new(SessionKeys::ALGORITHM);
        encode(&header, self, session_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                user_id = self.user_id,
                "failed to encode token"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })
    }

    /// Verifies a compact token and returns its claims.
    ///
    /// The signature must verify with the shared secret, the algorithm must be
    /// HS256 and `exp` must lie in the future.
    pub fn decode(token: &str, session_keys: &SessionKeys) -> Result<Self> {
        let mut validation = Validation::new(SessionKeys::ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&Self::REQUIRED_CLAIMS);

        let claims = decode::<Self>(token, session_keys.decoding_key(), &validation)
            .map_err(|e| {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    "token validation failed"
                );
                Error::from(e)
            })?
            .claims;

        if claims.is_expired() {
            return Err(ErrorKind::Unauthorized
                .with_message("Invalid JWT token")
                .with_context("token has expired")
                .with_resource("authentication"));
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            user_id = claims.user_id,
            expires_at = %claims.expires_at,
            "token validated"
        );

        Ok(claims)
    }
}

fn split_claim(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `sub` travels as a string and must parse as a user id.
mod subject {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(user_id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(user_id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let subject = String::deserialize(deserializer)?;
        subject.trim().parse().map_err(D::Error::custom)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let context = match error.kind() {
            JwtErrorKind::ExpiredSignature => "token has expired".to_owned(),
            JwtErrorKind::InvalidSignature => "token signature could not be verified".to_owned(),
            JwtErrorKind::InvalidAlgorithm => "token was signed with an unsupported algorithm".to_owned(),
            JwtErrorKind::InvalidToken => "token format is unrecognized".to_owned(),
            JwtErrorKind::MissingRequiredClaim(claim) => {
                format!("token is missing required claim: {claim}")
            }
            JwtErrorKind::Base64(_) => "token contains invalid base64".to_owned(),
            JwtErrorKind::Json(_) => "token payload is malformed".to_owned(),
            _ => error.to_string(),
        };

        ErrorKind::Unauthorized
            .with_message("Invalid JWT token")
            .with_context(context)
            .with_resource("authentication")
    }
}
