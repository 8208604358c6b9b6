//! Turns timeouts, middleware failures and handler panics into JSON 500s.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt, ready};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};
use crate::{TRACING_TARGET_RECOVERY_ERROR, TRACING_TARGET_RECOVERY_PANIC};

/// Default request budget in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request budget enforced by [`RouterRecoveryExt::with_recovery`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Seconds a request may run before it is answered with 500 `Request timeout`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl RecoveryConfig {
    /// Config with a budget of `secs` seconds.
    pub const fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Adds the recovery stack to a [`Router`].
pub trait RouterRecoveryExt<S> {
    /// Enforces the request timeout and converts panics into 500 responses.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// [`with_recovery`](Self::with_recovery) with a 30 second budget.
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        // HandleErrorLayer has to sit outside the fallible timeout layer.
        self.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timeout_or_failure))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

fn timeout_or_failure(err: tower::BoxError) -> BoxFuture<'static, Response> {
    let error = if err.is::<Elapsed>() {
        tracing::error!(target: TRACING_TARGET_RECOVERY_ERROR, "request exceeded its time budget");
        ErrorKind::InternalServerError
            .with_message("Request timeout")
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(target: TRACING_TARGET_RECOVERY_ERROR, error = %err, "middleware failed");
        ErrorKind::InternalServerError
            .with_message("An unexpected error occurred")
            .with_context(err.to_string())
    };

    ready(error.into_response()).boxed()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    // Handlers may `panic_any` a ready-made error.
    if let Some(error) = payload.downcast_ref::<Error<'static>>() {
        tracing::error!(target: TRACING_TARGET_RECOVERY_PANIC, error = %error, "handler panicked");
        return error.clone().into_response();
    }

    let detail = match (
        payload.downcast_ref::<String>(),
        payload.downcast_ref::<&'static str>(),
    ) {
        (Some(message), _) => message.as_str(),
        (None, Some(message)) => *message,
        (None, None) => "non-string panic payload",
    };
    tracing::error!(target: TRACING_TARGET_RECOVERY_PANIC, detail, "handler panicked");

    ErrorKind::InternalServerError
        .with_message("An unexpected panic occurred")
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "done"
    }

    async fn panics() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn slow_request_times_out() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/slow", get(slow))
            .with_recovery(&RecoveryConfig::with_timeout_secs(1));
        let server = TestServer::new(router)?;

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Request timeout");
        Ok(())
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/panic", get(panics))
            .with_default_recovery();
        let server = TestServer::new(router)?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "An unexpected panic occurred");
        assert_eq!(body["name"], "internal_server_error");
        Ok(())
    }
}
