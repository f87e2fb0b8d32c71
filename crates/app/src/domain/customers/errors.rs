//! Customers service errors.

use thiserror::Error;

use crate::{auth::AuthorizationError, database::StorageError, errors::ErrorKind};

#[derive(Debug, Error)]
pub enum CustomersServiceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("customer name must not be empty")]
    EmptyName,

    #[error("customer {0} not found")]
    NotFound(String),

    #[error("customer {0} already exists")]
    AlreadyExists(String),

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl CustomersServiceError {
    pub(crate) fn from_storage(email: &str, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound(email.to_string()),
            StorageError::AlreadyExists => Self::AlreadyExists(email.to_string()),
            other => Self::Storage(other),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::InvalidEmail(_) | Self::EmptyName => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}
