//! User request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload carrying a list of identifiers.
///
/// Assigns roles to a user, and is reused by the role permission endpoints
/// where the identifiers name permissions.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolesRequest {
    #[validate(length(min = 1, message = "Role IDs cannot be empty"))]
    pub role_ids: Vec<i64>,
}
