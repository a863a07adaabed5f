//! Key-value slot storage.
//!
//! # Responsibility
//! - Persist opaque string values under string keys.
//! - Keep SQL details inside the storage boundary.

use crate::repo::student_repo::RepoResult;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;

/// Whole-value string storage addressed by key.
pub trait KeyValueSlot {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes the value stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> RepoResult<()>;
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for &S {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed slots in the `kv_slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueSlot for SqliteSlotStore<'_> {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=repo status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local slots, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlot for MemorySlotStore {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
