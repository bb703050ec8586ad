//! The change bus: per-SKU fan-out of change events.
//!
//! One bounded broadcast topic per SKU. Publishing never blocks: a slow
//! session's buffer overwrites its oldest entries, and the session reports
//! the gap itself (see [`WatchSession`](crate::WatchSession)). Backpressure
//! never reaches the mutation path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, warn};

use stockpile_core::{ChangeEvent, ChangeSink, Sku};

use crate::session::WatchSession;

/// Default per-session buffer capacity.
pub const DEFAULT_CAPACITY: usize = 64;

type Topic = broadcast::Sender<Arc<ChangeEvent>>;

/// Routes each change event to every session currently subscribed to its
/// SKU, and only those.
///
/// Topics are created on first subscribe or first publish and dropped when
/// the SKU is removed or the last receiver disconnects, so repeated
/// subscribe/cancel cycles do not grow the registry.
pub struct ChangeBus {
    topics: RwLock<HashMap<Sku, Topic>>,
    capacity: usize,
}

impl ChangeBus {
    /// Create a bus with the given per-session buffer capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "watch buffer capacity must be at least 1");
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Register a new watch session for a SKU.
    ///
    /// Legal even if the SKU does not currently exist: the session simply
    /// waits, and a subsequent `Created` event is delivered. The returned
    /// session carries no initial snapshot; callers that have one seed it
    /// via [`WatchSession::seed`].
    pub fn subscribe(&self, sku: &Sku) -> WatchSession {
        let mut topics = self.topics.write().unwrap();
        let topic = topics
            .entry(sku.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        WatchSession::new(sku.clone(), topic.subscribe())
    }

    /// Number of live topics. Diagnostic; used to verify registry cleanup.
    pub fn topic_count(&self) -> usize {
        self.topics.read().unwrap().len()
    }

    /// Drop topics whose last receiver has disconnected.
    ///
    /// Cleanup also happens lazily on publish; this is for callers that want
    /// to reclaim registry entries for SKUs that are never published again.
    pub fn prune(&self) {
        let mut topics = self.topics.write().unwrap();
        let before = topics.len();
        topics.retain(|_, topic| topic.receiver_count() > 0);
        let dropped = before - topics.len();
        if dropped > 0 {
            debug!(dropped, "pruned idle watch topics");
        }
    }

}

impl ChangeSink for ChangeBus {
    fn publish(&self, event: Arc<ChangeEvent>) {
        let sku = event.sku.clone();

        if event.is_terminal() {
            // Detach the topic before sending. The SKU is gone; anyone who
            // subscribes from here on gets a fresh topic and waits for
            // `Created`, never a sender about to be dropped. Sessions that
            // were already attached still drain buffered events, including
            // the terminal one.
            let topic = self.topics.write().unwrap().remove(&sku);
            if let Some(topic) = topic {
                let _ = topic.send(event);
            }
            return;
        }

        let delivered = {
            let topics = self.topics.read().unwrap();
            match topics.get(&sku) {
                // send only fails when no receiver is connected
                Some(topic) => topic.send(event).is_ok(),
                None => return,
            }
        };

        if !delivered {
            // A subscriber may have attached between the failed send and
            // here; only remove the topic if it is still receiverless.
            let mut topics = self.topics.write().unwrap();
            if topics.get(&sku).is_some_and(|t| t.receiver_count() == 0) {
                warn!(%sku, "dropping watch topic with no subscribers");
                topics.remove(&sku);
            }
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
