//! HMAC signing keys for session tokens.
//!
//! Both services derive their encoding and decoding keys from the same shared
//! secret, so a token issued by the auth service verifies in the product
//! service without any network round trip.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Keys used for signing and verifying session tokens.
///
/// Cloning is cheap; all clones share the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    token_lifetime: SignedDuration,
}

impl SessionKeys {
    /// The only accepted signing algorithm.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Minimum secret length in bytes (256 bits).
    pub const MIN_SECRET_LEN: usize = 32;

    /// Derives the key pair from a shared secret.
    ///
    /// Fails with a configuration error when the secret is shorter than
    /// [`Self::MIN_SECRET_LEN`] bytes.
    pub fn from_secret(secret: impl AsRef<[u8]>, token_lifetime: SignedDuration) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.len() < Self::MIN_SECRET_LEN {
            tracing::error!(
                target: TRACING_TARGET,
                secret_len = secret.len(),
                min_len = Self::MIN_SECRET_LEN,
                "signing secret is too short",
            );

            return Err(Error::config(format!(
                "JWT secret must be at least {} bytes",
                Self::MIN_SECRET_LEN
            )));
        }

        if token_lifetime <= SignedDuration::ZERO {
            return Err(Error::config("JWT expiration must be positive"));
        }

        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            token_lifetime,
        });

        tracing::info!(
            target: TRACING_TARGET,
            token_lifetime_secs = token_lifetime.as_secs(),
            "signing keys loaded",
        );

        Ok(Self { inner })
    }

    /// Reads the shared secret from a file and derives the key pair.
    ///
    /// Surrounding whitespace (such as a trailing newline) is trimmed.
    pub async fn from_file(path: impl AsRef<Path>, token_lifetime: SignedDuration) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "loading signing secret from file",
        );

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "failed to read secret file",
            );

            Error::secret_file("failed to read JWT secret file").with_source(e)
        })?;

        Self::from_secret(content.trim(), token_lifetime)
    }

    /// Returns a reference to the decoding key.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns a reference to the encoding key.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns how long issued tokens stay valid.
    #[inline]
    pub fn token_lifetime(&self) -> SignedDuration {
        self.inner.token_lifetime
    }

    /// Checks that the keys can sign and verify a token.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Header, Validation, decode, encode};
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct TestClaims {
            sub: String,
            exp: i64,
        }

        let expires_at = Timestamp::now() + SignedDuration::from_mins(5);
        let claims = TestClaims {
            sub: "test".to_string(),
            exp: expires_at.as_second(),
        };

        let token = encode(&Header::new(Self::ALGORITHM), &claims, self.encoding_key())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "key validation failed during encoding",
                );

                Error::signing("key validation encoding failed").with_source(e)
            })?;

        let validation = Validation::new(Self::ALGORITHM);
        decode::<TestClaims>(&token, self.decoding_key(), &validation).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during decoding",
            );

            Error::signing("key validation decoding failed").with_source(e)
        })?;

        tracing::debug!(target: TRACING_TARGET, "key validation successful");
        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &Self::ALGORITHM)
            .field("token_lifetime", &self.inner.token_lifetime)
            .finish_non_exhaustive()
    }
}
