//! Database connection lifecycle.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;
use crate::schema;

/// SQLite-backed store for the shopper workflow.
///
/// Owns the connection; every query in this crate goes through it.
/// Foreign keys are enforced and the schema is created on open, so a
/// fresh path yields a ready (empty) database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open a database file, creating it and its schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Open(e.to_string()))?;
        let store = Self::init(conn)?;
        info!(path = %path.as_ref().display(), "database opened");
        Ok(store)
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Populate the demo catalog and shoppers. Idempotent.
    pub fn seed_demo(&self) -> Result<(), StoreError> {
        schema::seed_demo(&self.conn)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = Store::open_in_memory().unwrap();
        let n: i64 = store
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'basket_contents'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_open_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parana.db");
        {
            let store = Store::open(&path).unwrap();
            store.seed_demo().unwrap();
        }
        // Reopening sees the seeded data.
        let store = Store::open(&path).unwrap();
        let n: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM shoppers", [], |row| row.get(0))
            .unwrap();
        assert!(n > 0);
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let store = Store::open_in_memory().unwrap();
        let result = store.conn().execute(
            "INSERT INTO shopper_baskets (shopper_id, basket_created_date_time)
             VALUES (999, '2026-01-01 10:00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
