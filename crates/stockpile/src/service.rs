//! The Inventory facade: unified API over the store and the change bus.
//!
//! Operations mirror the wire schema's request/response pairs; an RPC
//! adapter maps each method onto one call, and `watch` onto the
//! server-streaming call.

use std::sync::Arc;

use tracing::debug;

use stockpile_core::Sku;
use stockpile_store::{InventorySnapshot, InventoryStore, SnapshotStore};
use stockpile_watch::{ChangeBus, WatchSession, DEFAULT_CAPACITY};

use crate::error::Result;
use crate::messages::{
    InventoryChangeResponse, InventoryUpdateResponse, Item, ItemIdentifier,
    ItemInformationRequest, Items, PriceChangeRequest, QuantityChangeRequest,
};

/// Configuration for the Inventory facade.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Per-watch-session buffer capacity. A session that falls further
    /// behind than this loses its oldest buffered events and degrades.
    pub watch_capacity: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            watch_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// The main Inventory service.
///
/// Composes the authoritative [`InventoryStore`] with a [`ChangeBus`]: every
/// applied mutation is published to the bus before the mutation's lock is
/// released, so each watch session observes its SKU's versions in order.
/// Read-only calls never touch the bus.
pub struct Inventory {
    store: Arc<InventoryStore>,
    bus: Arc<ChangeBus>,
}

impl Inventory {
    /// Create an inventory with default configuration.
    pub fn new() -> Self {
        Self::with_config(InventoryConfig::default())
    }

    /// Create an inventory with the given configuration.
    pub fn with_config(config: InventoryConfig) -> Self {
        let bus = Arc::new(ChangeBus::new(config.watch_capacity));
        let store = Arc::new(InventoryStore::with_sink(bus.clone()));
        Self { store, bus }
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Unary Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a new item. Fails with `AlreadyExists` if the SKU is present.
    pub fn add(&self, item: Item) -> Result<InventoryChangeResponse> {
        let new_item = item.try_into()?;
        self.store.add(new_item)?;
        Ok(InventoryChangeResponse {
            status: "success: item was added".into(),
        })
    }

    /// Fetch the current state of one item.
    pub fn get(&self, id: &ItemIdentifier) -> Result<Item> {
        let sku = id.to_sku()?;
        Ok(self.store.get(&sku)?.into())
    }

    /// Fetch a point-in-time view of every item.
    pub fn get_all(&self) -> Items {
        Items {
            items: self.store.iter_all().map(Item::from).collect(),
        }
    }

    /// Remove an item. Terminates all live watch sessions for its SKU with a
    /// terminal `Removed` event.
    pub fn remove(&self, id: &ItemIdentifier) -> Result<InventoryChangeResponse> {
        let sku = id.to_sku()?;
        self.store.remove(&sku)?;
        Ok(InventoryChangeResponse {
            status: "success: item was removed".into(),
        })
    }

    /// Increase an item's quantity by a delta.
    pub fn increase_quantity(
        &self,
        request: QuantityChangeRequest,
    ) -> Result<InventoryUpdateResponse> {
        let sku = Sku::new(request.sku)?;
        let record = self.store.increase_quantity(&sku, request.quantity)?;
        Ok(update_response(record.price, record.quantity))
    }

    /// Decrease an item's quantity by a delta. Fails with
    /// `InsufficientStock` when the delta exceeds the current quantity,
    /// leaving the item untouched.
    pub fn decrease_quantity(
        &self,
        request: QuantityChangeRequest,
    ) -> Result<InventoryUpdateResponse> {
        let sku = Sku::new(request.sku)?;
        let record = self.store.decrease_quantity(&sku, request.quantity)?;
        Ok(update_response(record.price, record.quantity))
    }

    /// Replace an item's price.
    pub fn update_price(&self, request: PriceChangeRequest) -> Result<InventoryUpdateResponse> {
        let sku = Sku::new(request.sku)?;
        let record = self.store.update_price(&sku, request.price)?;
        Ok(update_response(record.price, record.quantity))
    }

    /// Update an item's descriptive fields; unset fields stay untouched.
    pub fn update_information(
        &self,
        request: ItemInformationRequest,
    ) -> Result<InventoryUpdateResponse> {
        let sku = Sku::new(request.sku)?;
        let record = self
            .store
            .update_information(&sku, request.name, request.description)?;
        Ok(update_response(record.price, record.quantity))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Watch
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a watch session for one SKU.
    ///
    /// When the item exists, the session's first event is a synthetic
    /// snapshot of its current state; live events follow in version order.
    /// Watching a not-yet-existing SKU is legal: the session waits for its
    /// `Created` event. The session ends on drop, on
    /// [`close`](WatchSession::close), or when the SKU is removed.
    pub fn watch(&self, id: &ItemIdentifier) -> Result<WatchSession> {
        let sku = id.to_sku()?;

        // Subscribe before reading the snapshot: anything published in
        // between is buffered and deduplicated against the seed by version.
        let mut session = self.bus.subscribe(&sku);
        if let Ok(record) = self.store.get(&sku) {
            session.seed(record);
        }
        debug!(%sku, "watch session opened");
        Ok(session)
    }

    /// Reclaim bus registry entries for SKUs with no remaining watchers.
    pub fn prune_watch_topics(&self) {
        self.bus.prune();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Durability Hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Point-in-time copy of the whole inventory.
    pub fn snapshot(&self) -> InventorySnapshot {
        self.store.snapshot()
    }

    /// Replace the whole inventory from a snapshot. Publishes no events.
    pub fn restore(&self, snapshot: InventorySnapshot) -> Result<()> {
        self.store.restore(snapshot)?;
        Ok(())
    }

    /// Persist the current inventory through a snapshot backend.
    pub async fn save_to(&self, backend: &dyn SnapshotStore) -> Result<()> {
        backend.save(&self.snapshot()).await?;
        Ok(())
    }

    /// Load and restore a previously saved inventory. A backend with no
    /// saved snapshot leaves the inventory empty.
    pub async fn load_from(&self, backend: &dyn SnapshotStore) -> Result<()> {
        if let Some(snapshot) = backend.load().await? {
            self.restore(snapshot)?;
        }
        Ok(())
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

fn update_response(price: f64, quantity: u32) -> InventoryUpdateResponse {
    InventoryUpdateResponse {
        status: "success".into(),
        price,
        quantity,
    }
}
