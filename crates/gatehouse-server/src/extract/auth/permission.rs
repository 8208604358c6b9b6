//! The built-in permission catalog and authorization results.

use std::borrow::Cow;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::handler::{ErrorKind, Result};

/// Built-in permissions, named in `SCREAMING_SNAKE_CASE` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    // User management
    CreateUser,
    ReadUser,
    UpdateUser,
    DeleteUser,
    AssignRoles,

    // Role management
    CreateRole,
    ReadRole,
    UpdateRole,
    DeleteRole,
    AssignPermissions,

    // Permission management
    CreatePermission,
    ReadPermission,
    UpdatePermission,
    DeletePermission,

    // Product catalog
    ReadProducts,
    WriteProducts,
    DeleteProducts,
}

impl Permission {
    /// Returns the resource the permission applies to.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::CreateUser
            | Self::ReadUser
            | Self::UpdateUser
            | Self::DeleteUser
            | Self::AssignRoles => "USER",
            Self::CreateRole
            | Self::ReadRole
            | Self::UpdateRole
            | Self::DeleteRole
            | Self::AssignPermissions => "ROLE",
            Self::CreatePermission
            | Self::ReadPermission
            | Self::UpdatePermission
            | Self::DeletePermission => "PERMISSION",
            Self::ReadProducts | Self::WriteProducts | Self::DeleteProducts => "PRODUCT",
        }
    }

    /// Returns the action on the resource.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::CreateUser | Self::CreateRole | Self::CreatePermission => "CREATE",
            Self::ReadUser | Self::ReadRole | Self::ReadPermission | Self::ReadProducts => "READ",
            Self::UpdateUser | Self::UpdateRole | Self::UpdatePermission => "UPDATE",
            Self::DeleteUser | Self::DeleteRole | Self::DeletePermission | Self::DeleteProducts => {
                "DELETE"
            }
            Self::AssignRoles => "ASSIGN_ROLES",
            Self::AssignPermissions => "ASSIGN_PERMISSIONS",
            Self::WriteProducts => "WRITE",
        }
    }

    /// Returns a human readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateUser => "Create new users",
            Self::ReadUser => "View user details",
            Self::UpdateUser => "Update user information",
            Self::DeleteUser => "Delete users",
            Self::AssignRoles => "Assign roles to users",
            Self::CreateRole => "Create new roles",
            Self::ReadRole => "View role details",
            Self::UpdateRole => "Update role information",
            Self::DeleteRole => "Delete roles",
            Self::AssignPermissions => "Assign permissions to roles",
            Self::CreatePermission => "Create new permissions",
            Self::ReadPermission => "View permission details",
            Self::UpdatePermission => "Update permission information",
            Self::DeletePermission => "Delete permissions",
            Self::ReadProducts => "View products",
            Self::WriteProducts => "Create or update products",
            Self::DeleteProducts => "Delete products",
        }
    }

    /// Returns the wire name, e.g. `READ_PRODUCTS`.
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Result of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub granted: bool,
    pub reason: Option<Cow<'static, str>>,
}

impl AuthResult {
    /// Creates a granted authorization result.
    pub const fn granted() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    /// Creates a denied authorization result with a reason.
    pub fn denied(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            granted: false,
            reason: Some(reason.into()),
        }
    }

    /// Converts the result into a `Result`, returning a 403 error if access is denied.
    ///
    /// ```rust
    /// # use gatehouse_server::extract::AuthResult;
    /// assert!(AuthResult::granted().into_result().is_ok());
    /// assert!(AuthResult::denied("Access denied").into_result().is_err());
    /// ```
    pub fn into_result(self) -> Result<()> {
        if self.granted {
            return Ok(());
        }

        let error = match self.reason {
            Some(reason) => ErrorKind::Forbidden.with_message(reason),
            None => ErrorKind::Forbidden.into_error(),
        };

        Err(error.with_resource("authorization"))
    }
}

/// Evaluates the permission gate at the top of a handler.
///
/// Expands to `caller.authorize(permission).into_result()?`, so a denial
/// returns the 403 error from the enclosing handler.
///
/// ```rust,ignore
/// async fn delete_product(caller: Caller, ...) -> Result<StatusCode> {
///     authorize!(caller, Permission::DeleteProducts);
///     ...
/// }
/// ```
#[macro_export]
macro_rules! authorize {
    ($caller:expr, $permission:expr $(,)?) => {
        $caller.authorize($permission).into_result()?
    };
}
