//! Discount Code Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::discounts::records::{DiscountCodeUuid, DiscountKind};

/// New Discount Code Data
///
/// `value` is in minor units for [`DiscountKind::Fixed`] codes and a
/// percentage in `(0, 100]` for [`DiscountKind::Percentage`] codes.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountCode {
    pub uuid: DiscountCodeUuid,
    pub code: String,
    pub kind: DiscountKind,
    pub value: Decimal,
    pub expiration_date: Timestamp,
    pub is_active: bool,
}
