//! In-memory implementation of the SnapshotStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite but
//! keeps the saved snapshot in memory with no persistence.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{InventorySnapshot, SnapshotStore};

/// In-memory snapshot store.
///
/// The saved snapshot is lost when the store is dropped. Thread-safe via
/// RwLock.
#[derive(Default)]
pub struct MemorySnapshotStore {
    saved: RwLock<Option<InventorySnapshot>>,
}

impl MemorySnapshotStore {
    /// Create a new empty in-memory snapshot store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &InventorySnapshot) -> Result<()> {
        *self.saved.write().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<InventorySnapshot>> {
        Ok(self.saved.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_core::{ItemRecord, NewItem, Sku};

    fn snapshot_with(skus: &[&str]) -> InventorySnapshot {
        InventorySnapshot {
            items: skus
                .iter()
                .map(|s| {
                    ItemRecord::create(NewItem::new(Sku::new(*s).unwrap(), 1.0, 1)).unwrap()
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_load_before_save_is_none() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_previous() {
        let store = MemorySnapshotStore::new();

        store.save(&snapshot_with(&["A1", "B2"])).await.unwrap();
        store.save(&snapshot_with(&["C3"])).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.items[0].sku.as_str(), "C3");
    }
}
