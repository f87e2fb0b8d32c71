//! Discount code errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{auth::AuthorizationError, database::StorageError, errors::ErrorKind};

/// Validation failures when building a discount code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountCodeError {
    #[error("discount code must not be empty")]
    EmptyCode,

    #[error("unknown discount type: {0}")]
    UnknownKind(String),

    #[error("discount value must be greater than zero")]
    NonPositiveValue,

    #[error("percentage discount {0} exceeds 100")]
    PercentageOutOfRange(Decimal),

    #[error("fixed discount {0} must be a whole number of minor units")]
    FractionalFixedValue(Decimal),

    #[error("discount expiration date must be in the future")]
    ExpirationNotInFuture,
}

#[derive(Debug, Error)]
pub enum DiscountCodesServiceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("invalid discount code")]
    Invalid(#[from] DiscountCodeError),

    #[error("discount code {0} not found")]
    NotFound(String),

    #[error("discount code {0} already exists")]
    AlreadyExists(String),

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl DiscountCodesServiceError {
    pub(crate) fn from_storage(code: &str, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound(code.to_string()),
            StorageError::AlreadyExists => Self::AlreadyExists(code.to_string()),
            other => Self::Storage(other),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::Invalid(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}
