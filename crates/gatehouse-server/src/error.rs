//! Startup errors.
//!
//! Raised while [`ServiceState`](crate::service::ServiceState) is assembled:
//! reading the signing secret, checking it, deriving the token lifetime.
//! Request handlers return [`handler::Error`](crate::handler::Error) instead.

use std::borrow::Cow;
use std::error::Error as StdError;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for startup operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong while building the service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A configuration value is missing or out of range.
    Config,
    /// The secret file could not be read.
    SecretFile,
    /// The derived keys failed to sign or verify a test token.
    Signing,
}

/// Startup error with a kind, a message and an optional source.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Configuration value missing or out of range.
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Secret file unreadable.
    pub fn secret_file(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::SecretFile, message)
    }

    /// Key pair unusable.
    pub fn signing(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Attaches the underlying cause.
    pub fn with_source(self, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error() {
        let error = Error::config("JWT secret is too short");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "JWT secret is too short");
        assert_eq!(error.to_string(), "config error: JWT secret is too short");
    }

    #[test]
    fn secret_file_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::secret_file("failed to read JWT secret file").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(
            error.to_string(),
            "secret_file error: failed to read JWT secret file"
        );
    }
}
