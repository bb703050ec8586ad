//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use stockpile::{Inventory, Item, ItemIdentifier, ItemStock, WatchSession};
use stockpile_core::{ItemRecord, Sku};
use stockpile_store::MemorySnapshotStore;

/// Shorthand for a validated SKU in tests.
///
/// # Panics
///
/// Panics on an empty SKU; test inputs are expected to be valid.
pub fn sku(s: &str) -> Sku {
    Sku::new(s).expect("test SKU must be non-empty")
}

/// Build a wire-shaped item with stock levels only.
pub fn wire_item(sku: &str, price: f64, quantity: u32) -> Item {
    Item {
        identifier: ItemIdentifier::new(sku),
        stock: ItemStock { price, quantity },
        information: None,
    }
}

/// A test fixture with an inventory service and a memory snapshot backend.
pub struct TestFixture {
    pub inventory: Inventory,
    pub backend: MemorySnapshotStore,
}

impl TestFixture {
    /// Create a fixture with an empty inventory.
    pub fn new() -> Self {
        Self {
            inventory: Inventory::new(),
            backend: MemorySnapshotStore::new(),
        }
    }

    /// Create a fixture pre-seeded with `(sku, price, quantity)` items.
    pub fn with_items(items: &[(&str, f64, u32)]) -> Self {
        let fixture = Self::new();
        for &(sku, price, quantity) in items {
            fixture.add(sku, price, quantity);
        }
        fixture
    }

    /// Add an item, returning the version-1 record.
    pub fn add(&self, sku: &str, price: f64, quantity: u32) -> ItemRecord {
        self.inventory
            .add(wire_item(sku, price, quantity))
            .expect("fixture add must succeed");
        self.record(sku)
    }

    /// Current record for a SKU.
    pub fn record(&self, sku: &str) -> ItemRecord {
        self.inventory
            .store()
            .get(&crate::fixtures::sku(sku))
            .expect("fixture item must exist")
    }

    /// Open a watch session for a SKU.
    pub fn watch(&self, sku: &str) -> WatchSession {
        self.inventory
            .watch(&ItemIdentifier::new(sku))
            .expect("fixture watch must succeed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_core::ChangeKind;

    #[test]
    fn test_fixture_seeds_items() {
        let fixture = TestFixture::with_items(&[("A1", 9.99, 10), ("B2", 1.0, 0)]);

        assert_eq!(fixture.record("A1").quantity, 10);
        assert_eq!(fixture.record("B2").version, 1);
        assert_eq!(fixture.inventory.get_all().items.len(), 2);
    }

    #[tokio::test]
    async fn test_fixture_watch_sees_snapshot() {
        let fixture = TestFixture::with_items(&[("A1", 9.99, 10)]);

        let mut session = fixture.watch("A1");
        let event = session.next().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Updated);
        assert_eq!(event.snapshot.quantity, 10);
    }

    #[tokio::test]
    async fn test_fixture_backend_roundtrip() {
        let fixture = TestFixture::with_items(&[("A1", 9.99, 10)]);

        fixture.inventory.save_to(&fixture.backend).await.unwrap();

        let replica = TestFixture::new();
        replica.inventory.load_from(&fixture.backend).await.unwrap();
        assert_eq!(replica.record("A1").quantity, 10);
    }
}
