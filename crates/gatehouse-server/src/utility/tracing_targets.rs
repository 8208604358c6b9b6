//! Centralized tracing target constants for structured logging.
//!
//! Cross-cutting concerns log under one of these targets, so output can be
//! filtered per concern, e.g. `RUST_LOG=gatehouse_server::authorization=debug`.
//! Each handler module logs under its own `gatehouse_server::handler::<module>`
//! target instead.

/// Token extraction, validation and issuance.
pub const TRACING_TARGET_AUTHENTICATION: &str = "gatehouse_server::authentication";

/// Permission checks performed by the permission gate.
pub const TRACING_TARGET_AUTHORIZATION: &str = "gatehouse_server::authorization";

/// Request metrics and timing.
pub const TRACING_TARGET_METRICS: &str = "gatehouse_server::metrics";

/// Middleware errors and request timeouts.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "gatehouse_server::recovery::error";

/// Handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "gatehouse_server::recovery::panic";

/// Password hashing and verification.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "gatehouse_server::password_hasher";

/// Signing secret loading and key validation.
pub const TRACING_TARGET_SESSION_KEYS: &str = "gatehouse_server::session_keys";

/// Request bodies rejected by validation rules.
pub const TRACING_TARGET_VALIDATION: &str = "gatehouse_server::validation";

/// Bootstrap of the built-in permissions, admin role and admin user.
pub const TRACING_TARGET_BOOTSTRAP: &str = "gatehouse_server::bootstrap";
