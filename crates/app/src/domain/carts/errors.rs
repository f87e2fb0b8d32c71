//! Cart errors.

use thiserror::Error;

use crate::{
    auth::AuthorizationError,
    database::StorageError,
    domain::{
        orders::{
            errors::{OrderError, PaymentStatusError},
            records::OrderUuid,
        },
        products::records::ProductUuid,
    },
    errors::ErrorKind,
};

/// Rule violations raised by the [`Cart`](super::records::Cart) aggregate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u64,
    },

    #[error("product {0} is not in the cart")]
    ItemNotInCart(ProductUuid),

    #[error("discount code {0} is inactive or expired")]
    DiscountCodeInactive(String),

    #[error("percentage discount code {applied} is already applied")]
    PercentageDiscountAlreadyApplied { applied: String },

    #[error("discount code {0} is already applied")]
    DiscountCodeAlreadyApplied(String),

    #[error("discount code {0} is not applied to the cart")]
    DiscountCodeNotApplied(String),
}

impl CartError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuantity => ErrorKind::Validation,
            Self::ItemNotInCart(_) | Self::DiscountCodeNotApplied(_) => ErrorKind::NotFound,
            Self::InsufficientStock { .. }
            | Self::DiscountCodeInactive(_)
            | Self::PercentageDiscountAlreadyApplied { .. }
            | Self::DiscountCodeAlreadyApplied(_) => ErrorKind::Conflict,
        }
    }
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    InvalidPaymentStatus(#[from] PaymentStatusError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("cart for {0} is empty")]
    EmptyCart(String),

    #[error("cart for {0} not found")]
    CartNotFound(String),

    #[error("customer {0} not found")]
    CustomerNotFound(String),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("discount code {0} not found")]
    DiscountCodeNotFound(String),

    #[error("stock for product {0} kept changing, gave up after repeated conflicts")]
    StockContention(ProductUuid),

    #[error("failed to restore stock of product {product} to {stock}")]
    StockRestore {
        product: ProductUuid,
        stock: u64,
        #[source]
        source: StorageError,
    },

    #[error("failed to roll back order {order}")]
    OrderRollback {
        order: OrderUuid,
        #[source]
        source: StorageError,
    },

    #[error("storage error")]
    Storage(#[source] StorageError),
}

impl CartsServiceError {
    pub(crate) fn cart_storage(email: &str, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::CartNotFound(email.to_string()),
            other => Self::Storage(other),
        }
    }

    pub(crate) fn product_storage(product: ProductUuid, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::ProductNotFound(product),
            other => Self::Storage(other),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::Cart(error) => error.kind(),
            Self::InvalidPaymentStatus(_) | Self::Order(_) | Self::EmptyCart(_) => {
                ErrorKind::Validation
            }
            Self::CartNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::ProductNotFound(_)
            | Self::DiscountCodeNotFound(_) => ErrorKind::NotFound,
            Self::StockContention(_) => ErrorKind::Conflict,
            Self::StockRestore { .. } | Self::OrderRollback { .. } | Self::Storage(_) => {
                ErrorKind::Internal
            }
        }
    }
}
