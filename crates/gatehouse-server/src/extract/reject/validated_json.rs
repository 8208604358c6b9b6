//! JSON extractor that runs `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::TRACING_TARGET_VALIDATION;
use crate::handler::{Error, ErrorKind};

/// JSON extractor with validation.
///
/// Deserializes like [`Json`], then calls [`Validate::validate`]. Failures
/// become a 400 whose message lists every failing field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

fn extract_number(value: &serde_json::Value) -> Option<f64> {
    value.as_f64()
}

fn format_length_error(field: &str, params: &HashMap<Cow<'static, str>, serde_json::Value>) -> String {
    let min = params.get("min").and_then(extract_number);
    let max = params.get("max").and_then(extract_number);

    match (min, max) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max} long"),
        (Some(min), None) => format!("Field '{field}' must be at least {min} long"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max} long"),
        (None, None) => format!("Field '{field}' has invalid length"),
    }
}

fn format_range_error(field: &str, params: &HashMap<Cow<'static, str>, serde_json::Value>) -> String {
    let min = params.get("min").and_then(extract_number);
    let max = params.get("max").and_then(extract_number);

    match (min, max) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}"),
        (None, None) => format!("Field '{field}' is out of valid range"),
    }
}

fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    match error.code.as_ref() {
        "required" => format!("Field '{field}' is required"),
        "length" => format_length_error(field, &error.params),
        "range" => format_range_error(field, &error.params),
        "email" => format!("Field '{field}' must be a valid email address"),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
        field_errors.sort_by(|a, b| a.0.cmp(&b.0));

        let error_messages: Vec<String> = field_errors
            .iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        tracing::debug!(
            target: TRACING_TARGET_VALIDATION,
            errors = %user_message,
            "request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Email should be valid"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    async fn signup(ValidateJson(payload): ValidateJson<Signup>) -> String {
        payload.email
    }

    fn server() -> anyhow::Result<TestServer> {
        Ok(TestServer::new(Router::new().route("/", post(signup)))?)
    }

    #[tokio::test]
    async fn accepts_valid_payload() -> anyhow::Result<()> {
        let response = server()?
            .post("/")
            .json(&json!({ "email": "john@example.com", "password": "password123" }))
            .await;

        response.assert_status_ok();
        response.assert_text("john@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn lists_every_failing_field() -> anyhow::Result<()> {
        let response = server()?
            .post("/")
            .json(&json!({ "email": "not-an-email", "password": "123" }))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["message"],
            "Email should be valid. Field 'password' must be at least 6 long"
        );
        assert_eq!(body["resource"], "request");
        Ok(())
    }
}
