//! # Stockpile Store
//!
//! The authoritative inventory store and its persistence seam.
//!
//! ## Overview
//!
//! [`InventoryStore`] owns the SKU-to-record mapping and applies every
//! mutation under per-SKU exclusion, publishing a [`ChangeEvent`] into its
//! [`ChangeSink`] for each applied mutation. Durability is a pluggable
//! collaborator behind the [`SnapshotStore`] trait, with
//! [`SqliteSnapshotStore`] as the primary backend and
//! [`MemorySnapshotStore`] for tests.
//!
//! [`ChangeEvent`]: stockpile_core::ChangeEvent
//! [`ChangeSink`]: stockpile_core::ChangeSink
//!
//! ## Key Types
//!
//! - [`InventoryStore`] - Concurrent map of SKU to versioned record
//! - [`SnapshotStore`] - The async trait for snapshot persistence
//! - [`InventorySnapshot`] - A point-in-time copy of the whole inventory
//! - [`SqliteSnapshotStore`] - SQLite-based persistence
//! - [`MemorySnapshotStore`] - In-memory persistence for tests
//!
//! ## Design Notes
//!
//! - **Per-SKU exclusion**: mutations on one SKU are serialized; unrelated
//!   SKUs never contend. No global lock serializes writers.
//! - **No partial application**: a failed mutation leaves its record
//!   untouched and publishes nothing.
//! - **Publish under the lock**: events leave the store in version order per
//!   SKU because publishing happens before the serializing lock is released.

pub mod error;
pub mod inventory;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use inventory::InventoryStore;
pub use memory::MemorySnapshotStore;
pub use sqlite::SqliteSnapshotStore;
pub use traits::{InventorySnapshot, SnapshotStore};
