//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::not_blank;

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address of the new account.
    #[validate(email(message = "Email should be valid"))]
    pub email: String,

    /// Plain text password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name of the new account.
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    pub full_name: String,
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Email should be valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for changing the caller's password.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Password currently set on the account.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// Replacement password.
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}
