//! Role response types.

use gatehouse_store::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PermissionResponse;

/// Represents a role with its granted permissions.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    /// Unique identifier of the role.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the role is active.
    pub active: bool,
    /// Permissions granted by the role.
    pub permissions: Vec<PermissionResponse>,
    /// Timestamp when the role was created.
    pub created_at: Timestamp,
    /// Timestamp when the role was last updated.
    pub updated_at: Timestamp,
}

impl RoleResponse {
    /// Builds the response from a role and the rows of its granted permissions.
    pub fn from_model(role: model::Role, permissions: Vec<model::Permission>) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            active: role.active,
            permissions: permissions
                .into_iter()
                .map(PermissionResponse::from_model)
                .collect(),
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}
