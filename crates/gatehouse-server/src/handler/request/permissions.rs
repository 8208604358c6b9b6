//! Permission request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::not_blank;

/// Request payload for creating a permission.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermissionRequest {
    /// Unique permission name, e.g. `READ_PRODUCTS`.
    #[validate(custom(function = "not_blank", message = "Permission name is required"))]
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Resource the permission applies to.
    #[validate(custom(function = "not_blank", message = "Resource is required"))]
    pub resource: String,

    /// Action on the resource.
    #[validate(custom(function = "not_blank", message = "Action is required"))]
    pub action: String,
}

/// Query parameters for updating a permission description.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionQuery {
    pub description: String,
}
