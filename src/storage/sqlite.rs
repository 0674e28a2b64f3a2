use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::{check_quota, BackingStore};
use crate::error::Result;

/// Backing store kept in a single SQLite key/value table.
pub struct SqliteStorage {
    conn: Connection,
    capacity: usize,
}

impl SqliteStorage {
    /// Open or create the database at `path`
    pub fn open(path: &Path, capacity: usize) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn,
            capacity,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn,
            capacity: super::DEFAULT_CAPACITY_BYTES,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn used_bytes_except(&self, key: &str) -> Result<usize> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv WHERE key != ?1",
            [key],
            |row| row.get(0),
        )?;
        Ok(used as usize)
    }
}

impl BackingStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let used_by_others = self.used_bytes_except(key)?;
        check_quota(self.capacity, used_by_others, key, value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn used_bytes(&self) -> Result<usize> {
        self.used_bytes_except("")
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity
    }
}
