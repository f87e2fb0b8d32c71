//! Customers Data

use crate::domain::customers::records::CustomerUuid;

/// New Customer Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub email: String,
    pub name: String,
}
