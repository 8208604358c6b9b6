//! Security infrastructure services.
//!
//! Password hashing with Argon2id and the HMAC keys that sign and verify
//! session tokens.

mod password_hasher;
mod session_keys;

pub use password_hasher::PasswordHasher;
pub use session_keys::SessionKeys;
