//! Argon2id password hashes for user accounts.
//!
//! Failures come back as handler errors, so registration, login and password
//! changes forward them to the client unchanged.

use std::sync::{Arc, OnceLock};

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::Rng;
use rand::distr::Alphanumeric;
use rand::rngs::OsRng;

use crate::handler::{Error, ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER as TRACING_TARGET;

/// Length of the random password behind the decoy hash.
const DECOY_PASSWORD_LEN: usize = 24;

/// Hashes and checks account passwords.
///
/// Clones share the decoy hash used by [`verify_dummy_password`].
///
/// [`verify_dummy_password`]: PasswordHasher::verify_dummy_password
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy_hash: Arc<OnceLock<String>>,
}

fn hashing_failed(context: &'static str) -> Error<'static> {
    ErrorKind::InternalServerError
        .with_message("Password processing failed")
        .with_context(context)
        .with_resource("authentication")
}

fn verification_unavailable(context: &'static str) -> Error<'static> {
    ErrorKind::InternalServerError
        .with_message("Authentication temporarily unavailable")
        .with_context(context)
        .with_resource("authentication")
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the PHC string (algorithm, parameters, salt and digest) for
    /// `password` under a fresh salt.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "salt generation failed");
            hashing_failed("Salt generation error")
        })?;

        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET, error = %e, "argon2 hashing failed");
                hashing_failed("Hash generation error")
            })?;

        Ok(phc.to_string())
    }

    /// Checks `password` against a stored PHC string.
    ///
    /// A mismatch is 401 `Invalid email or password`; an unparsable hash or
    /// an Argon2 failure is a 500.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let phc = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(target: TRACING_TARGET, error = %e, "stored hash is not a PHC string");
            verification_unavailable("Hash format error")
        })?;

        match self.argon2.verify_password(password.as_bytes(), &phc) {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET, "password mismatch");
                Err(ErrorKind::Unauthorized
                    .with_message("Invalid email or password")
                    .with_resource("authentication"))
            }
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "argon2 verification failed");
                Err(verification_unavailable("Verification error"))
            }
        }
    }

    /// Spends one verification on a decoy hash and returns `false`.
    ///
    /// Login calls this for unknown emails so they cost as much time as a
    /// wrong password for a real account.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let decoy = match self.decoy_hash.get() {
            Some(hash) => hash,
            None => {
                let secret: String = rand::rng()
                    .sample_iter(Alphanumeric)
                    .take(DECOY_PASSWORD_LEN)
                    .map(char::from)
                    .collect();

                let Ok(hash) = self.hash_password(&secret) else {
                    return false;
                };
                self.decoy_hash.get_or_init(|| hash)
            }
        };

        let _ = self.verify_password(password, decoy);
        false
    }
}
