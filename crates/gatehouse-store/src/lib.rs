#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging store initialization and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "gatehouse_store::client";

/// Tracing target for repository operations.
///
/// Use this target for logging inserts, updates, deletes and rejected writes.
pub const TRACING_TARGET_QUERY: &str = "gatehouse_store::query";

mod client;
pub mod model;
pub mod query;

use std::borrow::Cow;

pub use crate::client::StoreClient;

/// Error type for all repository operations.
///
/// The variants mirror the integrity rules the store enforces: lookups by
/// identifier that miss, unique names that collide, and rows that cannot be
/// removed while other rows still reference them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum StoreError {
    /// A row referenced by identifier does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name, e.g. `"role"`.
        entity: &'static str,
        /// Identifier that was looked up.
        id: i64,
    },

    /// A unique name or email is already taken.
    #[error("{entity} already exists: {name}")]
    Conflict {
        /// Entity name, e.g. `"permission"`.
        entity: &'static str,
        /// The colliding unique value.
        name: Cow<'static, str>,
    },

    /// The row is still referenced and cannot be deleted.
    #[error("{entity} {id} is still referenced")]
    InUse {
        /// Entity name, e.g. `"role"`.
        entity: &'static str,
        /// Identifier of the referenced row.
        id: i64,
    },
}

impl StoreError {
    /// Creates a [`StoreError::NotFound`].
    #[inline]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Creates a [`StoreError::Conflict`].
    #[inline]
    pub fn conflict(entity: &'static str, name: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict {
            entity,
            name: name.into(),
        }
    }

    /// Creates a [`StoreError::InUse`].
    #[inline]
    pub const fn in_use(entity: &'static str, id: i64) -> Self {
        Self::InUse { entity, id }
    }

    /// Returns the entity name this error relates to.
    pub const fn entity(&self) -> &'static str {
        match self {
            Self::NotFound { entity, .. }
            | Self::Conflict { entity, .. }
            | Self::InUse { entity, .. } => entity,
        }
    }
}

/// Specialized [`Result`] type for repository operations.
pub type StoreResult<T, E = StoreError> = Result<T, E>;
