//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{
        carts::errors::CartError,
        customers::records::{CustomerRecord, CustomerUuid},
        discounts::records::{DiscountCode, DiscountKind},
        products::records::{ProductRecord, ProductRef, ProductUuid},
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// A product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product: ProductRef,
    pub quantity: u64,
}

impl CartItem {
    /// Line price: unit price times quantity.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.product.price.saturating_mul(self.quantity)
    }
}

/// Result of removing some quantity of a product from a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRemoval {
    /// The whole line was dropped.
    Removed,

    /// The line is still present with a lower quantity.
    Updated(CartItem),
}

/// Shopping cart aggregate.
///
/// Holds at most one line per product and at most one percentage discount
/// code. `total_amount` is recomputed by every mutation, so it always equals
/// [`Cart::calculate_total_amount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub customer_uuid: CustomerUuid,
    pub customer_email: String,
    items: Vec<CartItem>,
    discount_codes: Vec<DiscountCode>,
    total_amount: u64,
}

impl Cart {
    /// Empty cart belonging to the given customer.
    #[must_use]
    pub fn new(customer: &CustomerRecord) -> Self {
        Self::restore(
            CartUuid::new(),
            customer.uuid,
            customer.email.clone(),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Rebuild a cart from stored parts, recomputing its total.
    #[must_use]
    pub fn restore(
        uuid: CartUuid,
        customer_uuid: CustomerUuid,
        customer_email: String,
        items: Vec<CartItem>,
        discount_codes: Vec<DiscountCode>,
    ) -> Self {
        let mut cart = Self {
            uuid,
            customer_uuid,
            customer_email,
            items,
            discount_codes,
            total_amount: 0,
        };

        cart.refresh_total();

        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn discount_codes(&self) -> &[DiscountCode] {
        &self.discount_codes
    }

    #[must_use]
    pub const fn total_amount(&self) -> u64 {
        self.total_amount
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, product: ProductUuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.uuid == product)
    }

    /// Sum of all line prices before discounts.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.total_price()))
    }

    /// Subtotal minus every applied discount, floored at zero.
    ///
    /// Percentage codes are taken from the subtotal, never from an already
    /// discounted amount.
    #[must_use]
    pub fn calculate_total_amount(&self) -> u64 {
        let subtotal = self.subtotal();

        let discounts = self
            .discount_codes
            .iter()
            .fold(0u64, |sum, code| {
                sum.saturating_add(code.value.contribution(subtotal))
            });

        subtotal.saturating_sub(discounts)
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// The resulting line quantity must not exceed the product's stock. The
    /// line's product snapshot is refreshed from `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity and
    /// [`CartError::InsufficientStock`] when stock cannot cover the line.
    pub fn add_item(&mut self, product: &ProductRecord, quantity: u64) -> Result<CartItem, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let position = self
            .items
            .iter()
            .position(|item| item.product.uuid == product.uuid);

        let current = position.map_or(0, |index| self.items[index].quantity);
        let requested = current.saturating_add(quantity);

        if requested > product.stock {
            return Err(CartError::InsufficientStock {
                product: product.uuid,
                requested,
                available: product.stock,
            });
        }

        let item = match position {
            Some(index) => {
                let item = &mut self.items[index];

                item.product = product.reference();
                item.quantity = requested;

                item.clone()
            }
            None => {
                let item = CartItem {
                    uuid: CartItemUuid::new(),
                    product: product.reference(),
                    quantity: requested,
                };

                self.items.push(item.clone());

                item
            }
        };

        self.refresh_total();

        Ok(item)
    }

    /// Take `quantity` units of `product` out of the cart.
    ///
    /// Removing the line's full quantity or more drops the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity and
    /// [`CartError::ItemNotInCart`] when the product has no line.
    pub fn remove_item(
        &mut self,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<ItemRemoval, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let index = self
            .items
            .iter()
            .position(|item| item.product.uuid == product)
            .ok_or(CartError::ItemNotInCart(product))?;

        let removal = if quantity >= self.items[index].quantity {
            self.items.remove(index);

            ItemRemoval::Removed
        } else {
            let item = &mut self.items[index];

            item.quantity -= quantity;

            ItemRemoval::Updated(item.clone())
        };

        self.refresh_total();

        Ok(removal)
    }

    /// Apply a discount code as of `now`.
    ///
    /// # Errors
    ///
    /// Fails when the code is inactive or expired, when it is a percentage
    /// code and one is already applied, or when it is already applied.
    pub fn apply_discount_code(
        &mut self,
        code: DiscountCode,
        now: Timestamp,
    ) -> Result<(), CartError> {
        if !code.is_active_at(now) {
            return Err(CartError::DiscountCodeInactive(code.code));
        }

        if code.kind() == DiscountKind::Percentage
            && let Some(applied) = self
                .discount_codes
                .iter()
                .find(|applied| applied.kind() == DiscountKind::Percentage)
        {
            return Err(CartError::PercentageDiscountAlreadyApplied {
                applied: applied.code.clone(),
            });
        }

        if self.discount_codes.iter().any(|applied| applied.code == code.code) {
            return Err(CartError::DiscountCodeAlreadyApplied(code.code));
        }

        self.discount_codes.push(code);
        self.refresh_total();

        Ok(())
    }

    /// Remove an applied discount code, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DiscountCodeNotApplied`] when no such code is on
    /// the cart.
    pub fn remove_discount_code(&mut self, code: &str) -> Result<DiscountCode, CartError> {
        let index = self
            .discount_codes
            .iter()
            .position(|applied| applied.code == code)
            .ok_or_else(|| CartError::DiscountCodeNotApplied(code.to_string()))?;

        let removed = self.discount_codes.remove(index);

        self.refresh_total();

        Ok(removed)
    }

    /// Bring the cart in line with current product and discount code state.
    ///
    /// Each line takes its product snapshot from `products`. Applied codes are
    /// replaced by their stored versions in `current_codes`; a code missing
    /// there or no longer active at `now` is dropped. Returns the dropped
    /// codes.
    pub fn revalidate(
        &mut self,
        products: &[ProductRecord],
        current_codes: &[DiscountCode],
        now: Timestamp,
    ) -> Vec<String> {
        for item in &mut self.items {
            if let Some(product) = products
                .iter()
                .find(|product| product.uuid == item.product.uuid)
            {
                item.product = product.reference();
            }
        }

        let mut dropped = Vec::new();

        self.discount_codes = std::mem::take(&mut self.discount_codes)
            .into_iter()
            .filter_map(|applied| {
                match current_codes
                    .iter()
                    .find(|current| current.code == applied.code)
                {
                    Some(current) if current.is_active_at(now) => Some(current.clone()),
                    _ => {
                        dropped.push(applied.code);
                        None
                    }
                }
            })
            .collect();

        self.refresh_total();

        dropped
    }

    /// Drop every line and discount code.
    pub fn empty_cart(&mut self) {
        self.items.clear();
        self.discount_codes.clear();
        self.total_amount = 0;
    }

    fn refresh_total(&mut self) {
        self.total_amount = self.calculate_total_amount();
    }
}
