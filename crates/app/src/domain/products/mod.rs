//! Products
//!
//! Catalog management lives elsewhere; this module only reads products and
//! adjusts their stock.

pub mod data;
pub mod records;
mod repository;

pub use repository::*;
