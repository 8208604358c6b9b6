//! Request validation utilities.

use bigdecimal::{BigDecimal, Zero};
use validator::ValidationError;

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "must not be blank"));
    }

    Ok(())
}

/// Rejects prices that are zero or negative.
pub fn positive_price(price: &BigDecimal) -> Result<(), ValidationError> {
    if *price <= BigDecimal::zero() {
        return Err(validation_error("price", "Price must be greater than 0"));
    }

    Ok(())
}

/// Trait for normalizing required request data.
pub trait Normalized {
    /// Trims surrounding whitespace.
    fn normalized_string(&self) -> String;
}

/// Trait for normalizing optional request data.
pub trait OptionNormalized {
    /// Trims surrounding whitespace and drops values left empty.
    fn normalized_option(&self) -> Option<String>;
}

impl Normalized for String {
    fn normalized_string(&self) -> String {
        self.trim().to_owned()
    }
}

impl OptionNormalized for Option<String> {
    fn normalized_option(&self) -> Option<String> {
        self.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}
