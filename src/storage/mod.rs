//! Backing store: a synchronous, string-keyed, string-valued medium with a
//! capacity limit.
//!
//! Two implementations are provided. [`MemoryStorage`] keeps everything in a
//! map and is what tests use; [`SqliteStorage`] keeps a key/value table in a
//! SQLite file and is what the CLI uses.

pub mod codec;
mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::entity::CollectionKind;
use crate::error::{PlanbookError, Result};

pub const DEFAULT_KEY_PREFIX: &str = "planner-";

/// Default capacity, matching the usual per-origin browser storage quota.
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1024 * 1024;

pub trait BackingStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`PlanbookError::QuotaExceeded`] if the write would push the
    /// total size of keys and values over the capacity; the previous value is
    /// then left in place.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;

    /// Bytes currently used by keys and values.
    fn used_bytes(&self) -> Result<usize>;

    fn capacity_bytes(&self) -> usize;
}

/// Names of every persisted key, all sharing one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn collection(&self, kind: CollectionKind) -> String {
        format!("{}{}", self.prefix, kind.as_str())
    }

    pub fn budget_settings(&self) -> String {
        format!("{}budget-settings", self.prefix)
    }

    pub fn settings(&self) -> String {
        format!("{}settings", self.prefix)
    }

    pub fn language(&self) -> String {
        format!("{}language", self.prefix)
    }

    pub fn pomodoro_stats(&self) -> String {
        format!("{}pomodoro-stats", self.prefix)
    }

    /// Keys owned by the data store and purged by `clear_all`.
    pub fn data_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = CollectionKind::ALL
            .iter()
            .map(|kind| self.collection(*kind))
            .collect();
        keys.push(self.budget_settings());
        keys
    }
}

pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Reject a write that would take usage above `capacity`.
///
/// `used_by_others` is the usage of every entry except `key`.
pub(crate) fn check_quota(
    capacity: usize,
    used_by_others: usize,
    key: &str,
    value: &str,
) -> Result<()> {
    let needed = entry_size(key, value);
    let available = capacity.saturating_sub(used_by_others);
    if needed > available {
        return Err(PlanbookError::QuotaExceeded {
            key: key.to_string(),
            needed,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let keys = StorageKeys::default();
        assert_eq!(keys.collection(CollectionKind::Plans), "planner-plans");
        assert_eq!(keys.budget_settings(), "planner-budget-settings");
        assert_eq!(keys.language(), "planner-language");
        assert_eq!(keys.pomodoro_stats(), "planner-pomodoro-stats");
        assert_eq!(keys.data_keys().len(), 7);
        assert!(keys.data_keys().iter().all(|k| k.starts_with("planner-")));
    }

    #[test]
    fn test_custom_prefix() {
        let keys = StorageKeys::new("work.");
        assert_eq!(keys.collection(CollectionKind::Notes), "work.notes");
        assert_eq!(keys.settings(), "work.settings");
    }

    #[test]
    fn test_check_quota() {
        assert!(check_quota(10, 0, "k", "123456789").is_ok());
        let err = check_quota(10, 5, "k", "123456789").unwrap_err();
        assert!(matches!(
            err,
            PlanbookError::QuotaExceeded {
                needed: 10,
                available: 5,
                ..
            }
        ));
    }
}
