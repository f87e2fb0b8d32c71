//! Product Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u64,
    /// Incremented on every stock write; compared-and-swapped by
    /// [`ProductsRepository::update_stock`](super::ProductsRepository::update_stock).
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    #[must_use]
    pub fn reference(&self) -> ProductRef {
        ProductRef {
            uuid: self.uuid,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

/// Product snapshot embedded in cart and order lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
}
