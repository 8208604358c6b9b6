use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "config")]
use clap::{ArgAction, Args, ValueEnum};
use derive_builder::Builder;
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result, SessionKeys};

/// Default values for configuration options.
mod defaults {
    /// Default token lifetime: 24 hours.
    pub const JWT_EXPIRATION_SECS: u64 = 86_400;

    /// Development signing secret, only used by debug builds.
    #[cfg(debug_assertions)]
    pub const DEVELOPMENT_JWT_SECRET: &str =
        "gatehouse-development-secret-do-not-use-in-production";
}

/// Which of the two HTTP services the process runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceKind {
    /// Registration, login, users, roles and permissions.
    #[default]
    Auth,
    /// Product catalog guarded by the permission gate.
    Product,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Service to run in this process.
    #[cfg_attr(
        feature = "config",
        arg(long = "service", env = "SERVICE", value_enum, default_value_t = ServiceKind::Auth)
    )]
    #[builder(default)]
    pub service: ServiceKind,

    /// Shared HMAC secret used to sign and verify tokens (at least 32 bytes).
    #[cfg_attr(feature = "config", arg(long, env = "JWT_SECRET", hide_env_values = true))]
    #[serde(skip_serializing)]
    #[builder(default)]
    pub jwt_secret: Option<String>,

    /// File containing the shared HMAC secret; takes precedence over the inline secret.
    #[cfg_attr(feature = "config", arg(long, env = "JWT_SECRET_FILE"))]
    #[builder(default)]
    pub jwt_secret_file: Option<PathBuf>,

    /// Token lifetime in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "JWT_EXPIRATION_SECS", default_value_t = defaults::JWT_EXPIRATION_SECS)
    )]
    #[builder(default = "defaults::JWT_EXPIRATION_SECS")]
    pub jwt_expiration_secs: u64,

    /// Accept caller identity from `X-User-*` headers when no bearer token is sent.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "TRUST_FORWARDED_HEADERS",
            default_value_t = true,
            action = ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub trust_forwarded_headers: bool,

    /// Do not mount the `/init` bootstrap routes.
    #[cfg_attr(feature = "config", arg(long, env = "DISABLE_BOOTSTRAP"))]
    #[builder(default)]
    pub disable_bootstrap: bool,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Returns the configured token lifetime.
    pub fn token_lifetime(&self) -> Result<SignedDuration> {
        let secs = i64::try_from(self.jwt_expiration_secs)
            .map_err(|_| Error::config("JWT expiration is out of range"))?;
        Ok(SignedDuration::from_secs(secs))
    }

    /// Loads the signing keys from the secret file or the inline secret.
    pub async fn load_session_keys(&self) -> Result<SessionKeys> {
        let lifetime = self.token_lifetime()?;

        if let Some(path) = &self.jwt_secret_file {
            return SessionKeys::from_file(path, lifetime).await;
        }

        match &self.jwt_secret {
            Some(secret) => SessionKeys::from_secret(secret, lifetime),
            None => Err(Error::config(
                "JWT secret is not configured: set JWT_SECRET or JWT_SECRET_FILE",
            )),
        }
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(Some(secret)) = &builder.jwt_secret
            && secret.len() < SessionKeys::MIN_SECRET_LEN
        {
            return Err(format!(
                "JWT secret must be at least {} bytes",
                SessionKeys::MIN_SECRET_LEN
            ));
        }

        if let Some(secs) = &builder.jwt_expiration_secs
            && *secs == 0
        {
            return Err("JWT expiration must be greater than 0 seconds".to_string());
        }

        Ok(())
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service", &self.service)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret_file", &self.jwt_secret_file)
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .field("disable_bootstrap", &self.disable_bootstrap)
            .finish()
    }
}

#[cfg(debug_assertions)]
impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceKind::Auth,
            jwt_secret: Some(defaults::DEVELOPMENT_JWT_SECRET.to_string()),
            jwt_secret_file: None,
            jwt_expiration_secs: defaults::JWT_EXPIRATION_SECS,
            trust_forwarded_headers: true,
            disable_bootstrap: false,
        }
    }
}
