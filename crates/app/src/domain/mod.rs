//! Storefront Domain Concerns

pub mod carts;
pub mod customers;
pub mod discounts;
pub mod orders;
pub mod products;
