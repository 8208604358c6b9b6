//! Application state and dependency injection.

mod config;
mod security;

use gatehouse_store::StoreClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder, ServiceKind};
pub use crate::service::security::{PasswordHasher, SessionKeys};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // Storage:
    pub store: StoreClient,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
    pub service_config: ServiceConfig,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Loads the signing secret, checks that it signs and verifies a token,
    /// and opens an empty store.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let session_keys = config.load_session_keys().await?;
        session_keys.validate_keys()?;

        let service_state = Self {
            store: StoreClient::new(),

            password_hasher: PasswordHasher::new(),
            session_keys,
            service_config: config.clone(),
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(store: StoreClient);

impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
impl_di!(service_config: ServiceConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn state_starts_with_working_keys() -> anyhow::Result<()> {
        let state = ServiceState::from_config(&ServiceConfig::default()).await?;
        state.session_keys.validate_keys()?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_secret_fails_at_startup() {
        let config = ServiceConfig {
            jwt_secret: None,
            ..ServiceConfig::default()
        };

        let result = ServiceState::from_config(&config).await;
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::Config));
    }
}
