//! Monitor response types.

use serde::{Deserialize, Serialize};

/// Liveness status returned by `/actuator/health`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Always `UP` while the process serves requests.
    pub status: String,
    /// Name of the service answering.
    pub service: String,
}

impl HealthStatus {
    /// Creates an `UP` status for the named service.
    pub fn up(service: impl Into<String>) -> Self {
        Self {
            status: "UP".to_owned(),
            service: service.into(),
        }
    }
}
