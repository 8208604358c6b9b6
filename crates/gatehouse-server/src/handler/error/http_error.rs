//! The handler error: an [`ErrorKind`] plus optional overrides.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// Error returned by handlers and extractors.
///
/// The [`ErrorKind`] fixes the status code, the error name and a default
/// message. `message` replaces that default in the response body, while
/// `resource` and `context` are added next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

fn to_owned_cow(value: Option<Cow<'_, str>>) -> Option<Cow<'static, str>> {
    value.map(|v| Cow::Owned(v.into_owned()))
}

impl Error<'static> {
    /// Creates an error carrying only the defaults of `kind`.
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            resource: None,
            context: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Replaces the default message of the kind.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the resource the error is about, e.g. `"role"`.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds detail for debugging, rendered as `context`.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Detaches the error from any borrowed strings.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            message: to_owned_cow(self.message),
            resource: to_owned_cow(self.resource),
            context: to_owned_cow(self.context),
        }
    }

    /// Builds the JSON body sent to the client.
    fn into_error_response(self) -> ErrorResponse<'a> {
        let mut response = self.kind.response();
        if let Some(message) = self.message {
            response = response.with_message(message);
        }
        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }
        if let Some(context) = self.context {
            response = response.with_context(context);
        }
        response
    }
}

impl Default for Error<'static> {
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let defaults = self.kind.response();
        let message = self.message().unwrap_or(&defaults.message);
        write!(f, "{} ({}): {message}", defaults.name, defaults.status)?;

        if let Some(context) = self.context() {
            write!(f, " - {context}")?;
        }
        if let Some(resource) = self.resource() {
            write!(f, " [resource: {resource}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.into_error_response().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result of a handler or extractor.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Failure categories, each bound to one status code and default body.
#[must_use]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path segment missing or unparsable (400).
    MissingPathParam,
    /// Body, query or business rule rejected (400).
    BadRequest,
    /// No `Authorization` header (401).
    MissingAuthToken,
    /// `Authorization` header is not a bearer token (401).
    MalformedAuthToken,
    /// Bad credentials or an invalid token (401).
    Unauthorized,
    /// The permission gate said no (403).
    Forbidden,
    /// Unknown id or name (404).
    NotFound,
    /// State conflict (409).
    Conflict,
    /// Anything unexpected, including panics and timeouts (500).
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Same as `Error::from(kind)`.
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Shorthand for `Error::new(kind).with_message(..)`.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Shorthand for `Error::new(kind).with_resource(..)`.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Shorthand for `Error::new(kind).with_context(..)`.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Default body of this kind.
    pub const fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingPathParam => ErrorResponse::MISSING_PATH_PARAM,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::MissingAuthToken => ErrorResponse::MISSING_AUTH_TOKEN,
            Self::MalformedAuthToken => ErrorResponse::MALFORMED_AUTH_TOKEN,
            Self::Unauthorized => ErrorResponse::UNAUTHORIZED,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Conflict => ErrorResponse::CONFLICT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }

    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("Role not found with id: 3")
            .with_resource("role")
            .with_context("id: 3");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Role not found with id: 3"));
        assert_eq!(error.resource(), Some("role"));
        assert_eq!(error.context(), Some("id: 3"));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::Forbidden
            .with_message("Access denied: No permissions found")
            .with_resource("product");

        let display = error.to_string();
        assert!(display.contains("forbidden"));
        assert!(display.contains("403"));
        assert!(display.contains("Access denied: No permissions found"));
        assert!(display.contains("product"));
    }

    #[test]
    fn std_fmt_display_uses_default_message() {
        let display = Error::new(ErrorKind::NotFound).to_string();
        assert!(display.contains("The requested resource was not found"));
    }

    #[test]
    fn error_into_static() {
        let message = String::from("Invalid email or password");
        let error = ErrorKind::Unauthorized.with_message(message.as_str());

        let static_error = error.into_static();
        assert_eq!(static_error.message(), Some("Invalid email or password"));
    }

    #[test]
    fn all_error_kinds_have_responses() {
        let kinds = [
            ErrorKind::MissingPathParam,
            ErrorKind::BadRequest,
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::InternalServerError,
        ];

        for kind in kinds {
            let response = kind.response();
            assert!(!response.name.is_empty());
            assert!(response.status.as_u16() >= 400);
            assert_eq!(kind.into_response().status(), kind.status_code());
        }
    }
}
