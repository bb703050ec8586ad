//! Integration tests for watch semantics: initial snapshots, per-SKU version
//! ordering, slow consumers, removal, and cancellation.

use std::time::Duration;

use stockpile::{
    ChangeKind, Inventory, InventoryConfig, Item, ItemIdentifier, ItemStock,
    QuantityChangeRequest, SessionState,
};

fn item(sku: &str, price: f64, quantity: u32) -> Item {
    Item {
        identifier: ItemIdentifier::new(sku),
        stock: ItemStock { price, quantity },
        information: None,
    }
}

fn increase(inventory: &Inventory, sku: &str, delta: u32) {
    inventory
        .increase_quantity(QuantityChangeRequest {
            sku: sku.into(),
            quantity: delta,
        })
        .unwrap();
}

#[tokio::test]
async fn snapshot_first_then_live_events() {
    let inventory = Inventory::new();
    inventory.add(item("A1", 9.99, 10)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();

    increase(&inventory, "A1", 5);
    increase(&inventory, "A1", 7);

    // The watcher never waits for the first real mutation to learn current
    // state: the snapshot arrives first.
    let first = session.next().await.unwrap();
    assert_eq!(first.snapshot.quantity, 10);
    assert_eq!(first.version, 1);

    assert_eq!(session.next().await.unwrap().snapshot.quantity, 15);
    assert_eq!(session.next().await.unwrap().snapshot.quantity, 22);
}

#[tokio::test]
async fn versions_arrive_in_order_without_duplicates() {
    let inventory = Inventory::new();
    inventory.add(item("A1", 1.0, 0)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
    for _ in 0..20 {
        increase(&inventory, "A1", 1);
    }

    let mut last = 0;
    // Snapshot (v1) plus twenty updates
    for _ in 0..21 {
        let event = session.next().await.unwrap();
        assert!(event.version > last, "version went backward or repeated");
        last = event.version;
    }
    assert_eq!(last, 21);
}

#[tokio::test]
async fn watch_before_add_sees_created() {
    let inventory = Inventory::new();

    // Subscribing to a not-yet-existing SKU is legal and simply waits
    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();

    inventory.add(item("A1", 9.99, 3)).unwrap();

    let event = session.next().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.snapshot.quantity, 3);
}

#[tokio::test]
async fn remove_ends_the_stream_with_a_terminal_event() {
    let inventory = Inventory::new();
    inventory.add(item("A1", 9.99, 10)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
    assert_eq!(session.next().await.unwrap().version, 1);

    inventory.remove(&ItemIdentifier::new("A1")).unwrap();

    let terminal = session.next().await.unwrap();
    assert_eq!(terminal.kind, ChangeKind::Removed);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.next().await.is_none());
}

#[tokio::test]
async fn resubscribe_never_replays_seen_events() {
    let inventory = Inventory::new();
    inventory.add(item("A1", 1.0, 0)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
    increase(&inventory, "A1", 1);
    assert_eq!(session.next().await.unwrap().version, 1);
    assert_eq!(session.next().await.unwrap().version, 2);
    session.close();

    increase(&inventory, "A1", 1);
    increase(&inventory, "A1", 1);

    // The new session starts from the current snapshot, not history
    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
    let first = session.next().await.unwrap();
    assert_eq!(first.version, 4);

    increase(&inventory, "A1", 1);
    assert_eq!(session.next().await.unwrap().version, 5);
}

#[tokio::test]
async fn slow_consumer_degrades_without_blocking_writers() {
    let inventory = Inventory::with_config(InventoryConfig { watch_capacity: 4 });
    inventory.add(item("A1", 1.0, 0)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();

    // Far more events than the session buffer holds; every mutation must
    // still apply immediately.
    let started = std::time::Instant::now();
    for _ in 0..100 {
        increase(&inventory, "A1", 1);
    }
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(
        inventory
            .get(&ItemIdentifier::new("A1"))
            .unwrap()
            .stock
            .quantity,
        100
    );

    // The session skipped versions (a gap, not corruption) and stayed live
    let mut last = 0;
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(50), session.next()).await
    {
        assert!(event.version > last);
        last = event.version;
        if event.version == 101 {
            break;
        }
    }
    assert_eq!(last, 101);
    assert_eq!(session.state(), SessionState::Degraded);
    assert!(session.lagged() > 0);
}

#[tokio::test]
async fn concurrent_watchers_each_see_ordered_versions() {
    let inventory = std::sync::Arc::new(Inventory::new());
    inventory.add(item("A1", 1.0, 0)).unwrap();

    let mut watchers = Vec::new();
    for _ in 0..4 {
        let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
        watchers.push(tokio::spawn(async move {
            let mut last = 0;
            loop {
                let Some(event) = session.next().await else { break };
                assert!(event.version > last);
                last = event.version;
                if event.is_terminal() {
                    break;
                }
            }
            last
        }));
    }

    let writer = {
        let inventory = inventory.clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..50 {
                increase(&inventory, "A1", 1);
            }
            inventory.remove(&ItemIdentifier::new("A1")).unwrap();
        })
    };
    writer.await.unwrap();

    for watcher in watchers {
        // Every watcher ends on the terminal Removed version
        assert_eq!(watcher.await.unwrap(), 52);
    }
}

#[tokio::test]
async fn watcher_on_one_sku_ignores_others() {
    let inventory = Inventory::new();
    inventory.add(item("A1", 1.0, 0)).unwrap();
    inventory.add(item("B2", 1.0, 0)).unwrap();

    let mut session = inventory.watch(&ItemIdentifier::new("A1")).unwrap();
    assert_eq!(session.next().await.unwrap().snapshot.sku.as_str(), "A1");

    increase(&inventory, "B2", 5);
    increase(&inventory, "A1", 1);

    // Only the A1 mutation comes through
    let event = session.next().await.unwrap();
    assert_eq!(event.snapshot.sku.as_str(), "A1");
    assert_eq!(event.version, 2);
}
