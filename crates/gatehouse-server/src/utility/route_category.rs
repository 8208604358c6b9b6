//! Route categorization for metrics and logging.

use axum::http::Uri;

/// Route classification for metrics grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteCategory {
    Authentication,
    UserManagement,
    RoleManagement,
    PermissionManagement,
    Bootstrap,
    Products,
    Monitoring,
    Unknown,
}

impl RouteCategory {
    /// Categorizes a route based on its URI path.
    pub fn from_uri(uri: &Uri) -> Self {
        let path = uri.path();

        if matches!(
            path,
            "/register" | "/login" | "/change-password" | "/user-info" | "/health"
        ) {
            Self::Authentication
        } else if path.starts_with("/api/users") {
            Self::UserManagement
        } else if path.starts_with("/api/roles") {
            Self::RoleManagement
        } else if path.starts_with("/api/permissions") {
            Self::PermissionManagement
        } else if path.starts_with("/init/") {
            Self::Bootstrap
        } else if path.starts_with("/products") {
            Self::Products
        } else if path.starts_with("/actuator/") {
            Self::Monitoring
        } else {
            Self::Unknown
        }
    }

    /// Returns the string representation for logging and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "auth",
            Self::UserManagement => "users",
            Self::RoleManagement => "roles",
            Self::PermissionManagement => "permissions",
            Self::Bootstrap => "bootstrap",
            Self::Products => "products",
            Self::Monitoring => "monitoring",
            Self::Unknown => "unknown",
        }
    }
}
