use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::TRACING_TARGET_CLIENT;
use crate::model::{Permission, Product, Role, User};

/// In-process store shared by every request handler.
///
/// Cloning is cheap: all clones point at the same tables. Each repository
/// call takes the lock once, so checks and writes made by one call are never
/// interleaved with another call.
#[derive(Clone, Default)]
pub struct StoreClient {
    inner: Arc<RwLock<Tables>>,
}

/// All tables and their identifier sequences.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub permissions: Table<Permission>,
    pub roles: Table<Role>,
    pub users: Table<User>,
    pub products: Table<Product>,
}

/// Rows keyed by identifier plus the last identifier handed out.
#[derive(Debug)]
pub(crate) struct Table<T> {
    pub rows: BTreeMap<i64, T>,
    sequence: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            sequence: 0,
        }
    }
}

impl<T> Table<T> {
    /// Returns the next identifier. Identifiers start at 1 and are never reused.
    pub fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    /// Returns whether a row with the given identifier exists.
    #[inline]
    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Returns the rows in identifier order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

impl StoreClient {
    /// Creates an empty store.
    pub fn new() -> Self {
        tracing::debug!(target: TRACING_TARGET_CLIENT, "Initializing in-process store");
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient").finish_non_exhaustive()
    }
}
