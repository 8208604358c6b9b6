//! Repository traits for every table in the store.
//!
//! Every trait is implemented for [`StoreClient`](crate::StoreClient). Each
//! method takes the store lock exactly once, so uniqueness and reference checks
//! run under the same guard as the write they protect.

mod permission;
mod product;
mod role;
mod user;

pub use permission::PermissionRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

/// Trims an optional text column and drops it when it ends up empty.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::normalize_optional;

    #[test]
    fn optional_text_is_trimmed() {
        assert_eq!(normalize_optional(Some("  a ".into())), Some("a".into()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
