//! Error types for the Inventory facade.
//!
//! This is the outward taxonomy: one variant per outcome an RPC adapter
//! would map to a status code. Errors from the layered crates are flattened
//! into it via `From`.

use stockpile_core::{CoreError, Sku};
use stockpile_store::StoreError;
use thiserror::Error;

/// Errors returned by [`Inventory`](crate::Inventory) operations.
///
/// All errors are returned synchronously to the caller of the triggering
/// operation; nothing is retried internally, and a failed mutation never
/// leaves partial state behind.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Operation on an absent SKU.
    #[error("item not found: {0}")]
    NotFound(Sku),

    /// `add` on a SKU that is already present.
    #[error("item already exists: {0}")]
    AlreadyExists(Sku),

    /// Empty SKU, negative or non-finite price, or quantity overflow.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A decrease larger than the current quantity. The record is untouched.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Corrupt snapshot data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Failure in the snapshot persistence backend.
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<CoreError> for InventoryError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InsufficientStock {
                requested,
                available,
            } => InventoryError::InsufficientStock {
                requested,
                available,
            },
            other => InventoryError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<StoreError> for InventoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(sku) => InventoryError::NotFound(sku),
            StoreError::AlreadyExists(sku) => InventoryError::AlreadyExists(sku),
            StoreError::Invalid(core) => core.into(),
            StoreError::InvalidData(msg) => InventoryError::InvalidData(msg),
            other => InventoryError::Storage(other),
        }
    }
}

/// Result type for Inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_flatten_to_taxonomy() {
        let err: InventoryError = CoreError::EmptySku.into();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));

        let err: InventoryError = CoreError::InsufficientStock {
            requested: 5,
            available: 3,
        }
        .into();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                requested: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_store_errors_flatten_through_core() {
        let err: InventoryError = StoreError::Invalid(CoreError::InvalidPrice(-1.0)).into();
        assert!(matches!(err, InventoryError::InvalidArgument(_)));
    }
}
