//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Authentication ([`require_authentication`])
//! - Security: CORS and response headers ([`RouterSecurityExt`])
//! - Observability: request ids, tracing spans and metrics ([`RouterObservabilityExt`])
//! - Recovery: panics, timeouts and service errors ([`RouterRecoveryExt`])
//!
//! ```rust,ignore
//! use gatehouse_server::middleware::*;
//!
//! let app = router
//!     .with_metrics()
//!     .with_observability()
//!     .with_security(&CorsConfig::default())
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod auth;
mod observability;
mod recovery;
mod security;

pub use auth::require_authentication;
pub use observability::{RouterObservabilityExt, track_categorized_metrics};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
