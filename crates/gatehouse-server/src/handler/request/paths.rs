//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};

/// Path parameters for role operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePathParams {
    /// Unique identifier of the role.
    pub role_id: i64,
}

/// Path parameters for the role lookup by name.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleNamePathParams {
    pub name: String,
}

/// Path parameters for permission operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPathParams {
    /// Unique identifier of the permission.
    pub id: i64,
}

/// Path parameters for the permission listing by resource.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePathParams {
    pub resource: String,
}

/// Path parameters for user role assignment.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPathParams {
    /// Unique identifier of the user.
    pub user_id: i64,
}

/// Path parameters for product operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPathParams {
    /// Unique identifier of the product.
    pub id: i64,
}

/// Path parameters for the product listing by category.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPathParams {
    pub category: String,
}
