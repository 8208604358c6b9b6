//! Role rows.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A named group of permissions assigned to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: i64,
    /// Unique role name, e.g. `ROLE_ADMIN`.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether the role is active.
    pub active: bool,
    /// Identifiers of the permissions granted by this role.
    pub permission_ids: BTreeSet<i64>,
    /// Timestamp when the role was created.
    pub created_at: Timestamp,
    /// Timestamp when the role was last updated.
    pub updated_at: Timestamp,
}

impl Role {
    /// Returns whether this role grants the given permission.
    #[inline]
    pub fn grants(&self, permission_id: i64) -> bool {
        self.permission_ids.contains(&permission_id)
    }
}

/// Data for creating a new role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether the role starts active.
    pub active: bool,
    /// Identifiers of the permissions granted by this role.
    pub permission_ids: BTreeSet<i64>,
}

impl NewRole {
    /// Creates an active role payload with no permissions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            active: true,
            permission_ids: BTreeSet::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the granted permissions.
    pub fn with_permissions(mut self, permission_ids: impl IntoIterator<Item = i64>) -> Self {
        self.permission_ids = permission_ids.into_iter().collect();
        self
    }
}

/// Partial update of a role. Only fields set to `Some` are modified.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateRole {
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}
