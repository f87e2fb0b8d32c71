//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        carts::records::Cart,
        customers::records::CustomerSnapshot,
        orders::errors::{OrderError, PaymentError, PaymentStatusError},
        products::records::ProductRef,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Payment UUID
pub type PaymentUuid = TypedUuid<Payment>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact lowercase strings are accepted.
impl FromStr for PaymentStatus {
    type Err = PaymentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            "" => Err(PaymentStatusError::Missing),
            other => Err(PaymentStatusError::Invalid(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub uuid: PaymentUuid,
    pub amount: u64,
    pub date: Timestamp,
    pub status: PaymentStatus,
}

impl Payment {
    #[must_use]
    pub fn new(amount: u64, status: PaymentStatus, date: Timestamp) -> Self {
        Self {
            uuid: PaymentUuid::new(),
            amount,
            date,
            status,
        }
    }

    /// Mark an unpaid payment as paid.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::AlreadyPaid`] if the payment is already paid.
    pub fn pay(&mut self) -> Result<(), PaymentError> {
        if self.status == PaymentStatus::Paid {
            return Err(PaymentError::AlreadyPaid);
        }

        self.status = PaymentStatus::Paid;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product: ProductRef,
    pub quantity: u64,
}

impl OrderItem {
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidQuantity`] for a zero quantity.
    pub fn new(product: ProductRef, quantity: u64) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        Ok(Self {
            uuid: OrderItemUuid::new(),
            product,
            quantity,
        })
    }

    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.product.price.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer: CustomerSnapshot,
    pub items: Vec<OrderItem>,
    pub date: Timestamp,
    pub payment: Payment,
}

impl Order {
    /// Build an order, checking its items and dates against `now`.
    ///
    /// # Errors
    ///
    /// Fails when there are no items or either date lies after `now`.
    pub fn new(
        customer: CustomerSnapshot,
        items: Vec<OrderItem>,
        payment: Payment,
        date: Timestamp,
        now: Timestamp,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }

        if date > now {
            return Err(OrderError::DateInFuture);
        }

        if payment.date > now {
            return Err(OrderError::PaymentDateInFuture);
        }

        Ok(Self {
            uuid: OrderUuid::new(),
            customer,
            items,
            date,
            payment,
        })
    }

    /// Snapshot a cart into an order dated `now`.
    ///
    /// The payment amount is the cart's discounted total. Stock is not
    /// touched here.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NoItems`] for an empty cart.
    pub fn from_cart(
        cart: &Cart,
        customer: CustomerSnapshot,
        status: PaymentStatus,
        now: Timestamp,
    ) -> Result<Self, OrderError> {
        let items = cart
            .items()
            .iter()
            .map(|item| OrderItem::new(item.product.clone(), item.quantity))
            .collect::<Result<Vec<_>, _>>()?;

        let payment = Payment::new(cart.total_amount(), status, now);

        Self::new(customer, items, payment, now, now)
    }

    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.total_price()))
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::domain::{
        customers::records::{CustomerRecord, CustomerUuid},
        discounts::records::{DiscountCode, DiscountCodeUuid, DiscountValue},
        products::records::{ProductRecord, ProductUuid},
    };

    use super::*;

    fn customer() -> CustomerRecord {
        CustomerRecord {
            uuid: CustomerUuid::new(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            created_at: Timestamp::now(),
        }
    }

    fn product(name: &str, price: u64) -> ProductRecord {
        let now = Timestamp::now();

        ProductRecord {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            price,
            stock: 100,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn payment_status_parsing_is_exact() {
        assert_eq!("paid".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!("unpaid".parse::<PaymentStatus>(), Ok(PaymentStatus::Unpaid));
        assert_eq!(
            "PAID".parse::<PaymentStatus>(),
            Err(PaymentStatusError::Invalid("PAID".to_string()))
        );
        assert_eq!(
            " paid".parse::<PaymentStatus>(),
            Err(PaymentStatusError::Invalid(" paid".to_string()))
        );
        assert_eq!("".parse::<PaymentStatus>(), Err(PaymentStatusError::Missing));
    }

    #[test]
    fn paying_twice_fails() -> TestResult {
        let mut payment = Payment::new(100, PaymentStatus::Unpaid, Timestamp::now());

        payment.pay()?;

        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.pay(), Err(PaymentError::AlreadyPaid));

        Ok(())
    }

    #[test]
    fn from_cart_copies_lines_and_discounted_total() -> TestResult {
        let owner = customer();
        let mut cart = Cart::new(&owner);
        let shirt = product("Shirt", 2000);
        let now = Timestamp::now();

        cart.add_item(&shirt, 2)?;
        cart.add_item(&product("Shoe", 5000), 1)?;
        cart.apply_discount_code(
            DiscountCode {
                uuid: DiscountCodeUuid::new(),
                code: "SAVE10".to_string(),
                value: DiscountValue::Percentage(Decimal::TEN),
                expiration_date: now + SignedDuration::from_hours(1),
                is_active: true,
            },
            now,
        )?;

        let order = Order::from_cart(&cart, owner.snapshot(), PaymentStatus::Paid, now)?;

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product, shirt.reference());
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.subtotal(), 9000);
        assert_eq!(order.payment.amount, 8100);
        assert_eq!(order.payment.status, PaymentStatus::Paid);
        assert_eq!(order.customer.email, "ada@example.com");

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_become_an_order() {
        let owner = customer();
        let cart = Cart::new(&owner);

        let result = Order::from_cart(&cart, owner.snapshot(), PaymentStatus::Paid, Timestamp::now());

        assert_eq!(result, Err(OrderError::NoItems));
    }

    #[test]
    fn future_dates_are_rejected() -> TestResult {
        let now = Timestamp::now();
        let later = now + SignedDuration::from_mins(5);
        let item = OrderItem::new(product("Shirt", 2000).reference(), 1)?;

        let result = Order::new(
            customer().snapshot(),
            vec![item.clone()],
            Payment::new(2000, PaymentStatus::Unpaid, now),
            later,
            now,
        );

        assert_eq!(result, Err(OrderError::DateInFuture));

        let result = Order::new(
            customer().snapshot(),
            vec![item],
            Payment::new(2000, PaymentStatus::Unpaid, later),
            now,
            now,
        );

        assert_eq!(result, Err(OrderError::PaymentDateInFuture));

        Ok(())
    }

    #[test]
    fn zero_quantity_items_are_rejected() {
        let result = OrderItem::new(product("Shirt", 2000).reference(), 0);

        assert_eq!(result, Err(OrderError::InvalidQuantity));
    }
}
