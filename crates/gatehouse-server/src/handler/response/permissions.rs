//! Permission response types.

use gatehouse_store::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents a permission.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    /// Unique identifier of the permission.
    pub id: i64,
    /// Unique permission name, e.g. `READ_PRODUCTS`.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Resource the permission applies to.
    pub resource: String,
    /// Action on the resource.
    pub action: String,
    /// Timestamp when the permission was created.
    pub created_at: Timestamp,
    /// Timestamp when the permission was last updated.
    pub updated_at: Timestamp,
}

impl PermissionResponse {
    pub fn from_model(permission: model::Permission) -> Self {
        Self {
            id: permission.id,
            name: permission.name,
            description: permission.description,
            resource: permission.resource,
            action: permission.action,
            created_at: permission.created_at,
            updated_at: permission.updated_at,
        }
    }
}
