//! Permission rows.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A named capability granted to roles, e.g. `READ_PRODUCTS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: i64,
    /// Unique permission name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Resource the permission applies to, e.g. `PRODUCT`.
    pub resource: String,
    /// Action on the resource, e.g. `READ`.
    pub action: String,
    /// Timestamp when the permission was created.
    pub created_at: Timestamp,
    /// Timestamp when the permission was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new permission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NewPermission {
    /// Unique permission name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Resource the permission applies to.
    pub resource: String,
    /// Action on the resource.
    pub action: String,
}

impl NewPermission {
    /// Creates a new permission payload without a description.
    pub fn new(
        name: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
