//! Customer Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Customer Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub uuid: CustomerUuid,
    pub email: String,
    pub name: String,
    pub created_at: Timestamp,
}

impl CustomerRecord {
    #[must_use]
    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            uuid: self.uuid,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// Point-in-time copy of a customer, embedded in orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub uuid: CustomerUuid,
    pub email: String,
    pub name: String,
}
