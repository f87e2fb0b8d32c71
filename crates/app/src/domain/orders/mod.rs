//! Orders

pub mod errors;
pub mod placement;
pub mod records;
mod repository;
pub mod service;

pub use errors::{OrderError, OrdersServiceError, PaymentError, PaymentStatusError};
pub use placement::*;
pub use repository::*;
pub use service::*;
