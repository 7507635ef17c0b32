//! SQLite persistence for pantry records.
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Ids come from an AUTOINCREMENT primary key, so they are fresh and never
//! reused even after deletions. The `quantity >= 1` table constraint backs
//! up the reconciler: a record at quantity 0 cannot be persisted.

use crate::error::{PantryError, Result};
use crate::pantry::RecordStore;
use crate::reconcile::{InventoryRecord, RecordId};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed record store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initialises the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        log::info!("Opened pantry database: {}", path.display());
        Ok(Self { conn })
    }

    /// In-memory store, used in tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Creates the `items` table if it does not already exist.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS items (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            quantity   INTEGER NOT NULL CHECK (quantity >= 1),
            added_at   TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);",
    )?;
    log::debug!("Database schema initialized");
    Ok(())
}

/// Returns today's date as `YYYY-MM-DD` using local system time.
fn today_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

impl RecordStore for SqliteStore {
    fn create_record(&mut self, name: &str, quantity: u32) -> Result<RecordId> {
        self.conn.execute(
            "INSERT INTO items (name, quantity, added_at) VALUES (?1, ?2, ?3)",
            params![name, quantity, today_date()],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Created record {} ({} x{})", id, name, quantity);
        Ok(id)
    }

    fn update_record_quantity(&mut self, id: RecordId, quantity: u32) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE items SET quantity = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![quantity, id],
        )?;
        if changed == 0 {
            // Deleted out from under us by a racing writer
            return Err(PantryError::NotFound(id));
        }
        log::info!("Updated record {} to quantity {}", id, quantity);
        Ok(())
    }

    fn delete_record(&mut self, id: RecordId) -> Result<()> {
        self.conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        log::info!("Deleted record {}", id);
        Ok(())
    }

    fn list_records(&mut self) -> Result<Vec<InventoryRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, quantity FROM items")?;
        let records = stmt
            .query_map([], |row| {
                Ok(InventoryRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    quantity: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn schema_creates_table() {
        let store = test_store();
        let count: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='items'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let mut store = test_store();
        let a = store.create_record("Milk", 2).unwrap();
        let b = store.create_record("Eggs", 6).unwrap();
        assert_ne!(a, b);

        // Ids are never reused, even after a delete
        store.delete_record(b).unwrap();
        let c = store.create_record("Flour", 1).unwrap();
        assert!(c > b);
    }

    #[test]
    fn update_changes_quantity() {
        let mut store = test_store();
        let id = store.create_record("Milk", 2).unwrap();
        store.update_record_quantity(id, 5).unwrap();

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 5);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut store = test_store();
        let err = store.update_record_quantity(42, 1).unwrap_err();
        assert!(matches!(err, PantryError::NotFound(42)));
    }

    #[test]
    fn delete_removes_record() {
        let mut store = test_store();
        let id = store.create_record("Milk", 2).unwrap();
        store.delete_record(id).unwrap();
        assert!(store.list_records().unwrap().is_empty());
    }

    #[test]
    fn delete_is_idempotent_on_absence() {
        let mut store = test_store();
        store.delete_record(99).unwrap();
    }

    #[test]
    fn zero_quantity_rejected_by_schema() {
        let store = test_store();
        let result = store.conn.execute(
            "INSERT INTO items (name, quantity, added_at) VALUES ('Milk', 0, '2026-01-01')",
            [],
        );
        assert!(result.is_err(), "CHECK constraint must reject quantity 0");
    }

    #[test]
    fn list_returns_all_records() {
        let mut store = test_store();
        store.create_record("Milk", 2).unwrap();
        store.create_record("Eggs", 6).unwrap();

        let mut names: Vec<String> = store
            .list_records()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Eggs", "Milk"]);
    }

    #[test]
    fn today_date_format() {
        let date = today_date();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
