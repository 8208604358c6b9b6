//! Response types for HTTP handlers.

mod authentications;
mod errors;
mod monitors;
mod permissions;
mod products;
mod roles;
mod users;

pub use authentications::*;
pub use errors::*;
pub use monitors::*;
pub use permissions::*;
pub use products::*;
pub use roles::*;
pub use users::*;
