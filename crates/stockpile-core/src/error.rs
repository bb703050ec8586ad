//! Error types for the Stockpile core.

use thiserror::Error;

/// Core errors: validation failures on the data model.
///
/// Every variant corresponds to a rejected input. A rejected mutation never
/// modifies the record it was aimed at.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("SKU must not be empty")]
    EmptySku,

    #[error("invalid price {0}: must be a non-negative finite number")]
    InvalidPrice(f64),

    #[error("quantity overflow: {current} + {delta} exceeds u32::MAX")]
    QuantityOverflow { current: u32, delta: u32 },

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
