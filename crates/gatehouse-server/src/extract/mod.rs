//! Request extractors with structured rejections.
//!
//! # Authentication & Authorization
//!
//! - [`AuthHeader`] - bearer token extraction and validation
//! - [`AuthClaims`] - token claims with role and permission lists
//! - [`AuthState`] - verified principal
//! - [`Caller`] - identity a request acts as (principal or forwarded headers)
//! - [`Permission`] - built-in permission catalog
//! - [`AuthResult`] - result of authorization checks
//!
//! # Request Data Extraction
//!
//! - [`Json`] - JSON with structured error messages
//! - [`ValidateJson`] - JSON extraction followed by `validator` rules
//! - [`Path`] - path parameters
//! - [`Query`] - query parameters

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{
    AuthClaims, AuthHeader, AuthResult, AuthState, Caller, CallerSource, ForwardedIdentity,
    Permission, X_USER_EMAIL, X_USER_ID, X_USER_NAME, X_USER_PERMISSIONS, X_USER_ROLES,
};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
pub use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION, authorize};
