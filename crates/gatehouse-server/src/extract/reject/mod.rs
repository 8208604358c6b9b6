//! Request extractors that reject with [`Error`] instead of plain-text bodies.
//!
//! Drop-in replacements for the axum extractors of the same name.
//!
//! [`Error`]: crate::handler::Error

mod json;
mod path;
mod query;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::query::Query;
pub use self::validated_json::ValidateJson;

/// Keeps the first lines of a rejection message and caps its length.
fn sanitize_error_message(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}
