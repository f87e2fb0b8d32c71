//! Caller identity and role-based authorization.
//!
//! Authentication happens outside this crate; everything here trusts the
//! [`Caller`] it is handed and only answers whether that caller may act on a
//! given customer's resources.

mod errors;
mod guard;
mod models;

pub use errors::*;
pub use guard::*;
pub use models::*;
