//! SQLite implementation of the SnapshotStore trait.
//!
//! This is the primary durability backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking so a large snapshot
//! write never stalls the runtime.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::debug;

use stockpile_core::{ItemRecord, Sku};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InventorySnapshot, SnapshotStore};

/// SQLite-based snapshot store.
///
/// Thread-safe via internal Mutex; the connection moves onto a blocking
/// thread for each operation.
pub struct SqliteSnapshotStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSnapshotStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn join_err(e: tokio::task::JoinError) -> StoreError {
    StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRecord> {
    let sku: String = row.get("sku")?;
    let sku = Sku::new(sku).map_err(|_| {
        rusqlite::Error::InvalidColumnType(0, "sku".into(), rusqlite::types::Type::Text)
    })?;
    Ok(ItemRecord {
        sku,
        price: row.get("price")?,
        quantity: row.get("quantity")?,
        name: row.get("name")?,
        description: row.get("description")?,
        version: row.get("version")?,
    })
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn save(&self, snapshot: &InventorySnapshot) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let items = snapshot.items.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = conn.lock().unwrap();
            let tx = conn.transaction()?;

            // Whole-snapshot semantics: the new snapshot replaces the old one
            tx.execute("DELETE FROM items", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO items (sku, price, quantity, name, description, version)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for item in &items {
                    stmt.execute(params![
                        item.sku.as_str(),
                        item.price,
                        item.quantity,
                        item.name,
                        item.description,
                        item.version,
                    ])?;
                }
            }
            tx.execute(
                "INSERT INTO snapshot_meta (id, saved_at) VALUES (1, ?1)
                 ON CONFLICT(id) DO UPDATE SET saved_at = excluded.saved_at",
                params![now_millis()],
            )?;
            tx.commit()?;

            debug!(items = items.len(), "snapshot saved to sqlite");
            Ok(())
        })
        .await
        .map_err(join_err)?
    }

    async fn load(&self) -> Result<Option<InventorySnapshot>> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || -> Result<Option<InventorySnapshot>> {
            let conn = conn.lock().unwrap();

            // No metadata row means nothing has ever been saved
            let saved: Option<i64> = conn
                .query_row("SELECT saved_at FROM snapshot_meta WHERE id = 1", [], |row| {
                    row.get(0)
                })
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    e => Err(e),
                })?;
            if saved.is_none() {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                "SELECT sku, price, quantity, name, description, version FROM items",
            )?;
            let items = stmt
                .query_map([], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(InventorySnapshot { items }))
        })
        .await
        .map_err(join_err)?
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
