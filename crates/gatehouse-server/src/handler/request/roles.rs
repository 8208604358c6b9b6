//! Role request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::not_blank;

/// Request payload for creating a role.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    /// Unique role name.
    #[validate(custom(function = "not_blank", message = "Role name is required"))]
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Identifiers of the permissions the role grants.
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permission_ids: Vec<i64>,
}

/// Request payload for a partial role update.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub description: Option<String>,
    pub active: Option<bool>,
}
