//! Authentication and authorization.
//!
//! # Key Types
//!
//! - [`AuthHeader`] - bearer token extractor
//! - [`AuthClaims`] - token claims, issuance and verification
//! - [`AuthState`] - verified principal
//! - [`Caller`] - identity a request acts as, and the permission gate
//! - [`Permission`] - built-in permission catalog
//! - [`AuthResult`] - result of authorization checks

mod auth_state;
mod caller;
mod jwt_header;
mod permission;

pub use self::auth_state::AuthState;
pub use self::caller::{
    Caller, CallerSource, ForwardedIdentity, X_USER_EMAIL, X_USER_ID, X_USER_NAME,
    X_USER_PERMISSIONS, X_USER_ROLES,
};
pub use self::jwt_header::{AuthClaims, AuthHeader};
pub use self::permission::{AuthResult, Permission};
