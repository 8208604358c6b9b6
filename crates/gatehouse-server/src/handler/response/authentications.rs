//! Authentication response types.

use serde::{Deserialize, Serialize};

/// Response returned after a successful registration or login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed HS256 bearer token.
    pub token: String,
    /// Email of the authenticated user.
    pub email: String,
    /// Display name of the authenticated user.
    pub full_name: String,
    /// Comma-joined role names, identical to the token's `roles` claim.
    pub roles: String,
    /// Outcome message.
    pub message: String,
}

/// Plain message body used by operations without a resource to return.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Creates a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
