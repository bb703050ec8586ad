//! # Stockpile
//!
//! A concurrent inventory core: a SKU-keyed store with atomic numeric
//! mutation semantics and per-item change watching.
//!
//! ## Overview
//!
//! The [`Inventory`] facade composes the two halves of the system:
//!
//! - **Store**: a concurrent map of SKU to versioned item record. Mutations
//!   on one SKU are mutually exclusive and all-or-nothing; mutations on
//!   different SKUs run concurrently.
//! - **Watch**: every applied mutation becomes a change event, fanned out to
//!   the watch sessions subscribed to that SKU. Slow consumers degrade
//!   instead of blocking writers.
//!
//! The RPC transport is out of scope; operations take and return the
//! wire-shaped message types in [`messages`], so an adapter maps each method
//! onto one schema call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stockpile::{Inventory, Item, ItemIdentifier, ItemStock, QuantityChangeRequest};
//!
//! async fn example() {
//!     let inventory = Inventory::new();
//!
//!     inventory
//!         .add(Item {
//!             identifier: ItemIdentifier::new("A1"),
//!             stock: ItemStock { price: 9.99, quantity: 10 },
//!             information: None,
//!         })
//!         .unwrap();
//!
//!     // Watch starts with the current snapshot, then live changes
//!     let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
//!
//!     inventory
//!         .increase_quantity(QuantityChangeRequest { sku: "A1".into(), quantity: 5 })
//!         .unwrap();
//!
//!     let snapshot = session.next().await.unwrap();
//!     assert_eq!(snapshot.snapshot.quantity, 10);
//!     let updated = session.next().await.unwrap();
//!     assert_eq!(updated.snapshot.quantity, 15);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `stockpile::core` - Data model (ItemRecord, ChangeEvent, etc.)
//! - `stockpile::store` - The store and snapshot persistence
//! - `stockpile::watch` - The change bus and watch sessions

pub mod error;
pub mod messages;
pub mod service;

// Re-export component crates
pub use stockpile_core as core;
pub use stockpile_store as store;
pub use stockpile_watch as watch;

// Re-export main types for convenience
pub use error::{InventoryError, Result};
pub use messages::{
    InventoryChangeResponse, InventoryUpdateResponse, Item, ItemIdentifier, ItemInformation,
    ItemInformationRequest, ItemStock, Items, PriceChangeRequest, QuantityChangeRequest,
};
pub use service::{Inventory, InventoryConfig};

// Re-export commonly used core and component types
pub use stockpile_core::{ChangeEvent, ChangeKind, ItemRecord, NewItem, Sku};
pub use stockpile_store::{
    InventorySnapshot, InventoryStore, MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore,
};
pub use stockpile_watch::{SessionState, WatchSession};
