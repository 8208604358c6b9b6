//! Errors raised while binding or running the listener.

use std::io;

/// Result type for [`serve`](super::serve).
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Why the server could not start or stopped early.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host, port or timeouts failed validation.
    #[error("invalid server configuration: {0}")]
    InvalidConfig(String),

    /// The listener could not be bound.
    #[error("cannot listen on {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Accepting or serving connections failed.
    #[error("server stopped: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    pub fn bind_error(address: impl ToString, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Stable code logged next to the error.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "config",
            Self::BindError { .. } => "bind",
            Self::Runtime(_) => "runtime",
        }
    }

    /// Hint for the operator, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        let kind = match self {
            Self::InvalidConfig(_) => return Some("Run `gatehouse --help` for valid ranges"),
            Self::BindError { source, .. } | Self::Runtime(source) => source.kind(),
        };

        match kind {
            io::ErrorKind::AddrInUse => Some("Another process holds the port; pick another with --port"),
            io::ErrorKind::PermissionDenied => Some("Use a port at or above 1024"),
            io::ErrorKind::AddrNotAvailable => Some("The --host address is not assigned to this machine"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_in_use_suggests_another_port() {
        let err = ServerError::bind_error(
            "127.0.0.1:8081",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert_eq!(err.to_string(), "cannot listen on 127.0.0.1:8081: address in use");
        assert_eq!(err.error_code(), "bind");
        assert!(err.suggestion().is_some_and(|s| s.contains("--port")));
    }

    #[test]
    fn unexpected_runtime_error_has_no_hint() {
        let err = ServerError::Runtime(io::Error::other("boom"));
        assert_eq!(err.error_code(), "runtime");
        assert!(err.suggestion().is_none());
    }
}
