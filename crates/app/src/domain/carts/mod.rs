//! Carts

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::{CartError, CartsServiceError};
pub use repository::*;
pub use service::*;
