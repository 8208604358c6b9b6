//! User response types.

use gatehouse_store::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents a user with the names of the assigned roles.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub enabled: bool,
    /// Names of the assigned roles, in role id order.
    pub roles: Vec<String>,
    pub last_login_at: Option<Timestamp>,
}

impl UserResponse {
    pub fn from_model(user: model::User, roles: Vec<String>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            enabled: user.enabled,
            roles,
            last_login_at: user.last_login_at,
        }
    }
}
