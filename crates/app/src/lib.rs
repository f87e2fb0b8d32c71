//! Storefront cart and order core.

pub mod auth;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod saga;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
