//! Order errors.

use thiserror::Error;

use crate::{
    auth::AuthorizationError, database::StorageError, domain::orders::records::OrderUuid,
    errors::ErrorKind,
};

/// Payment status strings other than exactly `paid` or `unpaid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentStatusError {
    #[error("payment status is required")]
    Missing,

    #[error("invalid payment status {0:?}, expected \"paid\" or \"unpaid\"")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment has already been made")]
    AlreadyPaid,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("an order must contain at least one item")]
    NoItems,

    #[error("order item quantity must be greater than zero")]
    InvalidQuantity,

    #[error("order date must not be in the future")]
    DateInFuture,

    #[error("payment date must not be in the future")]
    PaymentDateInFuture,
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("order {0} not found")]
    NotFound(OrderUuid),

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl OrdersServiceError {
    pub(crate) fn from_storage(order: OrderUuid, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound(order),
            other => Self::Storage(other),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::Payment(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}
