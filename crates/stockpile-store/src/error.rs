//! Error types for the store module.

use stockpile_core::{CoreError, Sku};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operation on an absent SKU.
    #[error("item not found: {0}")]
    NotFound(Sku),

    /// `add` on a SKU that is already present.
    #[error("item already exists: {0}")]
    AlreadyExists(Sku),

    /// Validation failure on the data model (bad price, overflow,
    /// insufficient stock).
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data in a snapshot (e.g. duplicate SKUs).
    #[error("invalid snapshot data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
