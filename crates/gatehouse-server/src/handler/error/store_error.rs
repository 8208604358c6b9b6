//! Mapping from repository errors to HTTP errors.

use gatehouse_store::StoreError;

use super::{Error, ErrorKind};

/// Returns the display name of a store entity.
fn display_name(entity: &str) -> &'static str {
    match entity {
        "permission" => "Permission",
        "role" => "Role",
        "user" => "User",
        "product" => "Product",
        _ => "Resource",
    }
}

impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        let resource = error.entity();

        match error {
            StoreError::NotFound { entity, id } => ErrorKind::NotFound
                .with_message(format!("{} not found with id: {}", display_name(entity), id))
                .with_resource(resource),
            StoreError::Conflict { entity: "user", .. } => ErrorKind::BadRequest
                .with_message("Email already registered")
                .with_resource(resource),
            StoreError::Conflict { entity, name } => ErrorKind::BadRequest
                .with_message(format!("{} already exists: {}", display_name(entity), name))
                .with_resource(resource),
            StoreError::InUse { entity: "role", .. } => ErrorKind::BadRequest
                .with_message("Cannot delete role that is assigned to users")
                .with_resource(resource),
            StoreError::InUse { entity: "permission", .. } => ErrorKind::BadRequest
                .with_message("Cannot delete permission that is assigned to roles")
                .with_resource(resource),
            StoreError::InUse { entity, id } => ErrorKind::BadRequest
                .with_message(format!("{} {} is still in use", display_name(entity), id))
                .with_resource(resource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_uses_entity_name() {
        let error = Error::from(StoreError::not_found("product", 7));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Product not found with id: 7"));
        assert_eq!(error.resource(), Some("product"));
    }

    #[test]
    fn conflicts_are_bad_requests() {
        let error = Error::from(StoreError::conflict("role", "ROLE_ADMIN"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Role already exists: ROLE_ADMIN"));

        let error = Error::from(StoreError::conflict("user", "a@example.com"));
        assert_eq!(error.message(), Some("Email already registered"));
    }

    #[test]
    fn in_use_explains_reference() {
        let error = Error::from(StoreError::in_use("permission", 2));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(
            error.message(),
            Some("Cannot delete permission that is assigned to roles")
        );

        let error = Error::from(StoreError::in_use("role", 1));
        assert_eq!(
            error.message(),
            Some("Cannot delete role that is assigned to users")
        );
    }
}
