//! Request types for HTTP handlers.

mod authentications;
mod paths;
mod permissions;
mod products;
mod roles;
mod users;
mod validations;

pub use authentications::*;
pub use paths::*;
pub use permissions::*;
pub use products::*;
pub use roles::*;
pub use users::*;
pub use validations::*;
