//! Watch sessions: the server-side state behind one `Watch` call.
//!
//! A session bridges bus pushes to a pull API: the caller awaits
//! [`WatchSession::next`] and gets events for its SKU in non-decreasing
//! version order, starting with a synthetic snapshot event when the item
//! existed at watch time.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use stockpile_core::{ChangeEvent, ChangeKind, ItemRecord, Sku};

/// The lifecycle of a watch session.
///
/// `Active → Degraded → Closed`, or `Active → Closed` directly. No
/// transition leaves `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Delivering every event.
    Active,
    /// Still live, but the consumer fell behind and events were dropped;
    /// version gaps are possible from here on.
    Degraded,
    /// Terminal: the caller closed the session, the SKU was removed, or the
    /// topic went away.
    Closed,
}

/// One subscriber's cursor onto the change feed for a single SKU.
///
/// Per-session guarantees: versions never go backward, no version is
/// delivered twice. A slow consumer may skip versions; the skipped count is
/// reported via [`lagged`](Self::lagged) and the state drops to `Degraded`,
/// but the session stays live. Dropping the session (or calling
/// [`close`](Self::close)) releases its bus registration.
pub struct WatchSession {
    sku: Sku,
    rx: Option<broadcast::Receiver<Arc<ChangeEvent>>>,
    pending: Option<Arc<ChangeEvent>>,
    last_version: u64,
    lagged: u64,
    state: SessionState,
}

impl WatchSession {
    pub(crate) fn new(sku: Sku, rx: broadcast::Receiver<Arc<ChangeEvent>>) -> Self {
        Self {
            sku,
            rx: Some(rx),
            pending: None,
            last_version: 0,
            lagged: 0,
            state: SessionState::Active,
        }
    }

    /// Seed the session with the current snapshot.
    ///
    /// The snapshot is delivered as a synthetic `Updated` event before any
    /// live event, so a watcher never waits for the first real mutation to
    /// learn current state. Events already buffered with versions at or
    /// below the snapshot's are suppressed: the seed and the live feed
    /// cannot reorder.
    pub fn seed(&mut self, snapshot: ItemRecord) {
        self.last_version = snapshot.version;
        self.pending = Some(Arc::new(ChangeEvent::new(ChangeKind::Updated, snapshot)));
    }

    /// The SKU this session watches.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Total events skipped because the consumer fell behind.
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    /// Await the next event.
    ///
    /// Returns `None` once the session is closed; every call after that also
    /// returns `None`. A `Removed` event is yielded to the caller and then
    /// the session closes itself: removal is a visible terminal event, never
    /// a silent stream end.
    pub async fn next(&mut self) -> Option<Arc<ChangeEvent>> {
        if let Some(initial) = self.pending.take() {
            return Some(initial);
        }

        let rx = self.rx.as_mut()?;
        loop {
            match rx.recv().await {
                Ok(event) => {
                    // Suppress anything at or below the cursor; the seed
                    // snapshot may already cover buffered events.
                    if event.version <= self.last_version {
                        continue;
                    }
                    self.last_version = event.version;
                    if event.is_terminal() {
                        self.shut();
                    }
                    return Some(event);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.lagged += skipped;
                    if self.state == SessionState::Active {
                        self.state = SessionState::Degraded;
                        warn!(
                            sku = %self.sku,
                            skipped,
                            "watch session fell behind; events dropped"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.shut();
                    return None;
                }
            }
        }
    }

    /// Close the session and release its bus registration. Idempotent.
    pub fn close(&mut self) {
        self.pending = None;
        self.shut();
    }

    fn shut(&mut self) {
        self.rx = None;
        self.state = SessionState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ChangeBus;
    use stockpile_core::{ChangeSink, NewItem};

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn record(version: u64) -> ItemRecord {
        let mut rec = ItemRecord::create(NewItem::new(sku("A1"), 1.0, 0)).unwrap();
        rec.version = version;
        rec
    }

    fn publish(bus: &ChangeBus, version: u64, kind: ChangeKind) {
        bus.publish(Arc::new(ChangeEvent::new(kind, record(version))));
    }

    #[tokio::test]
    async fn test_seed_delivered_first() {
        let bus = ChangeBus::default();
        let mut session = bus.subscribe(&sku("A1"));
        session.seed(record(3));

        publish(&bus, 4, ChangeKind::Updated);

        let first = session.next().await.unwrap();
        assert_eq!(first.version, 3);
        assert_eq!(first.kind, ChangeKind::Updated);
        assert_eq!(session.next().await.unwrap().version, 4);
    }

    #[tokio::test]
    async fn test_seed_suppresses_buffered_duplicates() {
        let bus = ChangeBus::default();
        let mut session = bus.subscribe(&sku("A1"));

        // Events race in between subscribe and the snapshot read the seed
        // is built from; both land in the buffer.
        publish(&bus, 2, ChangeKind::Updated);
        publish(&bus, 3, ChangeKind::Updated);
        session.seed(record(3));
        publish(&bus, 4, ChangeKind::Updated);

        let versions = [
            session.next().await.unwrap().version,
            session.next().await.unwrap().version,
        ];
        assert_eq!(versions, [3, 4]);
    }

    #[tokio::test]
    async fn test_lag_degrades_but_stays_live() {
        let bus = ChangeBus::new(2);
        let mut session = bus.subscribe(&sku("A1"));

        for version in 1..=10 {
            publish(&bus, version, ChangeKind::Updated);
        }

        // Only the newest two fit the buffer; the gap is reported, not fatal
        assert_eq!(session.next().await.unwrap().version, 9);
        assert_eq!(session.state(), SessionState::Degraded);
        assert_eq!(session.lagged(), 8);
        assert_eq!(session.next().await.unwrap().version, 10);
    }

    #[tokio::test]
    async fn test_versions_never_go_backward_across_lag() {
        let bus = ChangeBus::new(4);
        let mut session = bus.subscribe(&sku("A1"));

        let mut last = 0;
        for round in 0u64..5 {
            for i in 1..=8 {
                publish(&bus, round * 8 + i, ChangeKind::Updated);
            }
            while let Ok(event) =
                tokio::time::timeout(std::time::Duration::from_millis(10), session.next()).await
            {
                let event = event.unwrap();
                assert!(event.version > last);
                last = event.version;
                if event.version == (round + 1) * 8 {
                    break;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_removed_is_yielded_then_closed() {
        let bus = ChangeBus::default();
        let mut session = bus.subscribe(&sku("A1"));

        publish(&bus, 1, ChangeKind::Created);
        publish(&bus, 2, ChangeKind::Removed);

        assert_eq!(session.next().await.unwrap().kind, ChangeKind::Created);
        let terminal = session.next().await.unwrap();
        assert_eq!(terminal.kind, ChangeKind::Removed);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.next().await.is_none());
        assert!(session.next().await.is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let bus = ChangeBus::default();
        let mut session = bus.subscribe(&sku("A1"));
        session.seed(record(1));

        session.close();
        session.close();
        assert_eq!(session.state(), SessionState::Closed);

        // Even the pending seed is gone after close
        assert!(session.next().await.is_none());
    }
}
