//! The authoritative in-memory inventory store.
//!
//! Owns the SKU-to-record mapping; all access to records funnels through this
//! API. Mutations on one SKU are mutually exclusive; mutations on different
//! SKUs proceed concurrently.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use stockpile_core::{ChangeEvent, ChangeKind, ChangeSink, ItemRecord, NewItem, NullSink, Sku};

use crate::error::{Result, StoreError};
use crate::traits::InventorySnapshot;

/// One record slot. The `Mutex` is the per-SKU unit of mutual exclusion.
type Slot = Arc<Mutex<ItemRecord>>;

/// The authoritative store: a concurrent map of SKU to versioned record.
///
/// # Locking
///
/// Two levels: an outer `RwLock` over the map, and a `Mutex` per record.
/// Mutation of an existing record holds the map *read* lock plus that one
/// record's lock, so unrelated SKUs never contend and no global lock
/// serializes writers. Structural operations (`add`, `remove`, `restore`)
/// take the map write lock briefly. Record locks are leaf locks: they are
/// taken with a map guard held, never the other way around.
///
/// # Event ordering
///
/// Events are published through the [`ChangeSink`] while the lock that
/// serialized the mutation is still held. Publishing never blocks, and doing
/// it under the lock is what guarantees that events for one SKU reach the
/// sink in version order.
pub struct InventoryStore {
    items: RwLock<HashMap<Sku, Slot>>,
    sink: Arc<dyn ChangeSink>,
}

impl InventoryStore {
    /// Create a store that discards change events.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NullSink))
    }

    /// Create a store publishing change events into the given sink.
    pub fn with_sink(sink: Arc<dyn ChangeSink>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Create a new record, failing with `AlreadyExists` if the SKU is
    /// present. Emits `Created` and returns the version-1 snapshot.
    pub fn add(&self, item: NewItem) -> Result<ItemRecord> {
        let mut map = self.items.write().unwrap();
        match map.entry(item.sku.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(item.sku)),
            Entry::Vacant(slot) => {
                let record = ItemRecord::create(item)?;
                slot.insert(Arc::new(Mutex::new(record.clone())));
                self.emit(ChangeKind::Created, record.clone());
                Ok(record)
            }
        }
    }

    /// Snapshot of the current record for one SKU.
    pub fn get(&self, sku: &Sku) -> Result<ItemRecord> {
        let slot = self.slot(sku)?;
        let record = slot.lock().unwrap();
        Ok(record.clone())
    }

    /// Point-in-time iteration over all current records.
    ///
    /// Record handles are collected under the map read lock, then each record
    /// is snapshotted individually as the iterator advances. Items added or
    /// removed mid-iteration may or may not appear, but every yielded
    /// snapshot is internally consistent. No moment holds more than one
    /// record lock.
    pub fn iter_all(&self) -> impl Iterator<Item = ItemRecord> {
        let slots: Vec<Slot> = {
            let map = self.items.read().unwrap();
            map.values().cloned().collect()
        };
        slots.into_iter().map(|slot| slot.lock().unwrap().clone())
    }

    /// Delete the record, failing with `NotFound` if absent.
    ///
    /// Emits a terminal `Removed` event carrying the final state with the
    /// version bumped once more, so it orders strictly after the last update
    /// for every watcher. Returns the final snapshot.
    pub fn remove(&self, sku: &Sku) -> Result<ItemRecord> {
        let mut map = self.items.write().unwrap();
        let slot = map
            .remove(sku)
            .ok_or_else(|| StoreError::NotFound(sku.clone()))?;

        // No mutator can hold this lock: they need the map read lock, and we
        // hold the write lock.
        let mut record = slot.lock().unwrap();
        record.bump();
        let last = record.clone();
        self.emit(ChangeKind::Removed, last.clone());
        Ok(last)
    }

    /// `quantity += delta`. Emits `Updated`, returns the new snapshot.
    pub fn increase_quantity(&self, sku: &Sku, delta: u32) -> Result<ItemRecord> {
        self.mutate(sku, |record| record.increase_quantity(delta))
    }

    /// `quantity -= delta`, failing with `InsufficientStock` when `delta`
    /// exceeds the current quantity. Emits `Updated`, returns the new
    /// snapshot.
    pub fn decrease_quantity(&self, sku: &Sku, delta: u32) -> Result<ItemRecord> {
        self.mutate(sku, |record| record.decrease_quantity(delta))
    }

    /// Replace the price. Emits `Updated`, returns the new snapshot.
    pub fn update_price(&self, sku: &Sku, price: f64) -> Result<ItemRecord> {
        self.mutate(sku, |record| record.update_price(price))
    }

    /// Partial update of name/description; `None` fields stay untouched.
    /// Emits `Updated`, returns the new snapshot.
    pub fn update_information(
        &self,
        sku: &Sku,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<ItemRecord> {
        self.mutate(sku, |record| {
            record.update_information(name, description);
            Ok(())
        })
    }

    /// Number of items currently in the store.
    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap().is_empty()
    }

    /// Eager whole-inventory snapshot for the persistence collaborator.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self.iter_all().collect(),
        }
    }

    /// Replace the entire inventory with the given snapshot.
    ///
    /// A bootstrap operation: versions are taken from the snapshot as-is and
    /// no change events are published. Watchers attached across a restore
    /// keep their cursor and only see subsequent events.
    pub fn restore(&self, snapshot: InventorySnapshot) -> Result<()> {
        let mut map = HashMap::with_capacity(snapshot.items.len());
        for record in snapshot.items {
            let sku = record.sku.clone();
            if map.insert(sku.clone(), Arc::new(Mutex::new(record))).is_some() {
                return Err(StoreError::InvalidData(format!(
                    "duplicate SKU in snapshot: {sku}"
                )));
            }
        }

        let count = map.len();
        *self.items.write().unwrap() = map;
        debug!(items = count, "inventory restored from snapshot");
        Ok(())
    }

    /// Look up the slot for a SKU under the map read lock.
    fn slot(&self, sku: &Sku) -> Result<Slot> {
        let map = self.items.read().unwrap();
        map.get(sku)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(sku.clone()))
    }

    /// Apply a mutation under per-SKU exclusion.
    ///
    /// The map read guard is held across the record mutation so a concurrent
    /// `remove` (which needs the write lock) cannot detach the record while
    /// we are writing to it.
    fn mutate<F>(&self, sku: &Sku, f: F) -> Result<ItemRecord>
    where
        F: FnOnce(&mut ItemRecord) -> stockpile_core::error::Result<()>,
    {
        let map = self.items.read().unwrap();
        let slot = map
            .get(sku)
            .ok_or_else(|| StoreError::NotFound(sku.clone()))?;

        let mut record = slot.lock().unwrap();
        f(&mut record)?;
        let snapshot = record.clone();
        self.emit(ChangeKind::Updated, snapshot.clone());
        Ok(snapshot)
    }

    fn emit(&self, kind: ChangeKind, snapshot: ItemRecord) {
        debug!(
            sku = %snapshot.sku,
            version = snapshot.version,
            ?kind,
            "inventory change applied"
        );
        self.sink.publish(Arc::new(ChangeEvent::new(kind, snapshot)));
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}
