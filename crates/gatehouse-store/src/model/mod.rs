//! Row models for every table in the store.
//!
//! Each table has a row type returned by the repositories and a `New*`
//! payload used for inserts. Tables with mutable columns also have an
//! `Update*` payload.

mod permission;
mod product;
mod role;
mod user;

pub use permission::{NewPermission, Permission};
pub use product::{NewProduct, Product, UpdateProduct};
pub use role::{NewRole, Role, UpdateRole};
pub use user::{NewUser, User, UserGrants};
