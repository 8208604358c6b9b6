//! User rows.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique email address, trimmed and lower-cased.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Disabled accounts cannot log in.
    pub enabled: bool,
    /// Locked accounts cannot log in.
    pub account_non_locked: bool,
    /// Timestamp of the last successful login.
    pub last_login_at: Option<Timestamp>,
    /// Identifiers of the roles assigned to this user.
    pub role_ids: BTreeSet<i64>,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email address; normalized on insert.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// Whether the account is unlocked.
    pub account_non_locked: bool,
    /// Roles assigned on creation.
    pub role_ids: BTreeSet<i64>,
}

impl NewUser {
    /// Creates an enabled, unlocked user payload with no roles.
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            full_name: full_name.into(),
            enabled: true,
            account_non_locked: true,
            role_ids: BTreeSet::new(),
        }
    }

    /// Sets the assigned roles.
    pub fn with_roles(mut self, role_ids: impl IntoIterator<Item = i64>) -> Self {
        self.role_ids = role_ids.into_iter().collect();
        self
    }
}

/// Role and permission names granted to a user.
///
/// Roles are listed in identifier order, permissions are distinct and listed
/// in the order they are first reached through those roles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserGrants {
    /// Names of the assigned roles.
    pub roles: Vec<String>,
    /// Distinct names of the permissions granted through those roles.
    pub permissions: Vec<String>,
}
