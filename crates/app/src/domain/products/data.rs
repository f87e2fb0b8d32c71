//! Products Data

/// Compare-and-swap stock write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    pub stock: u64,
    pub expected_version: u64,
}
