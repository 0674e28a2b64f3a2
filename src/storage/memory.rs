use std::collections::BTreeMap;

use super::{check_quota, entry_size, BackingStore, DEFAULT_CAPACITY_BYTES};
use crate::error::Result;

/// In-memory backing store.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    capacity: usize,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_BYTES)
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
        }
    }
}

impl BackingStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let current = self
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        let used_by_others = self.used_bytes()? - current;
        check_quota(self.capacity, used_by_others, key, value)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn used_bytes(&self) -> Result<usize> {
        Ok(self.entries.iter().map(|(k, v)| entry_size(k, v)).sum())
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity
    }
}
