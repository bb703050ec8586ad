//! SnapshotStore trait: the abstract interface for durable persistence.
//!
//! The inventory store is authoritative in memory; durability is a pluggable
//! collaborator behind this save/load contract. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockpile_core::ItemRecord;

use crate::error::Result;

/// A point-in-time copy of the whole inventory.
///
/// Produced by [`InventoryStore::snapshot`](crate::InventoryStore::snapshot)
/// and consumed by `restore`. Item order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: Vec<ItemRecord>,
}

impl InventorySnapshot {
    /// Number of items in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The SnapshotStore trait: async interface for snapshot persistence.
///
/// All methods are async to support blocking backends (SQLite uses
/// `spawn_blocking` internally) without stalling the runtime.
///
/// # Design Notes
///
/// - **Whole-snapshot semantics**: `save` replaces any previously saved
///   snapshot; there is no incremental write path.
/// - **Load is optional**: `load` returns `None` when nothing has been saved,
///   which callers treat as an empty inventory.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot, replacing whatever was saved before.
    async fn save(&self, snapshot: &InventorySnapshot) -> Result<()>;

    /// Load the most recently saved snapshot, if any.
    async fn load(&self) -> Result<Option<InventorySnapshot>>;
}
