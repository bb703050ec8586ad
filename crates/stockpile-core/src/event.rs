//! Change events: one applied mutation, as seen by watchers.
//!
//! Events are produced by the store at mutation time and shared read-only
//! with every subscribed watch session. Sessions never mutate an event, so
//! fan-out is an `Arc` clone, not a deep copy.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::item::ItemRecord;
use crate::sku::Sku;

/// What kind of mutation produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The record was created by `add`.
    Created,
    /// An in-place mutation was applied.
    Updated,
    /// The record was destroyed by `remove`. Terminal for watchers.
    Removed,
}

/// An applied mutation on one SKU.
///
/// `version` matches `snapshot.version`; it is carried at the top level so
/// routing and ordering never need to look inside the snapshot. For `Removed`
/// the snapshot is the final state of the record with the version bumped once
/// more, so the terminal event orders strictly after the last update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub sku: Sku,
    pub version: u64,
    pub kind: ChangeKind,
    pub snapshot: ItemRecord,
}

impl ChangeEvent {
    /// Build an event from a post-mutation snapshot.
    pub fn new(kind: ChangeKind, snapshot: ItemRecord) -> Self {
        Self {
            sku: snapshot.sku.clone(),
            version: snapshot.version,
            kind,
            snapshot,
        }
    }

    /// Whether this event ends the stream for its SKU.
    pub fn is_terminal(&self) -> bool {
        self.kind == ChangeKind::Removed
    }
}

/// The seam through which the store publishes change events.
///
/// Implementations must not block: the store calls `publish` while still
/// holding the exclusion that serialized the mutation, which is what makes
/// per-session version order a guarantee. Watcher backpressure is the
/// implementation's problem, never the mutation path's.
pub trait ChangeSink: Send + Sync {
    /// Deliver an event to whoever is listening for its SKU.
    fn publish(&self, event: Arc<ChangeEvent>);
}

/// A sink that discards every event.
///
/// Default wiring for stores that run without watchers, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn publish(&self, _event: Arc<ChangeEvent>) {}
}
