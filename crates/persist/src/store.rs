//! Store module - the key-value abstraction the save layer writes through
//!
//! Persistence targets a platform key-value facility rather than raw
//! files, so the trait speaks strings and integers under string keys.
//! [`MemoryStore`] is the in-process implementation used by tests and
//! headless runs; platform adapters supply their own.

use std::collections::HashMap;

use anyhow::Result;

/// Abstract key-value storage.
///
/// `get_*` return `Ok(None)` for missing keys; `Err` is reserved for
/// storage-level failures. `flush` forces buffered writes out and is a
/// no-op for stores that write through.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;
    fn get_i64(&self, key: &str) -> Result<Option<i64>>;
    fn set_i64(&mut self, key: &str, value: i64) -> Result<()>;
    fn contains(&self, key: &str) -> Result<bool>;
    fn delete(&mut self, key: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// In-memory store backed by a hash map. Integers share the string
/// namespace, stored in decimal.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.entries.get(key) {
            Some(raw) => Ok(raw.parse::<i64>().ok()),
            None => Ok(None),
        }
    }

    fn set_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_read_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_string("nope").unwrap(), None);
        assert_eq!(store.get_i64("nope").unwrap(), None);
        assert!(!store.contains("nope").unwrap());
    }

    #[test]
    fn test_string_round_trip() {
        let mut store = MemoryStore::new();
        store.set_string("save", "{}").unwrap();
        assert_eq!(store.get_string("save").unwrap().as_deref(), Some("{}"));
        assert!(store.contains("save").unwrap());
    }

    #[test]
    fn test_int_round_trip() {
        let mut store = MemoryStore::new();
        store.set_i64("best", 1234).unwrap();
        assert_eq!(store.get_i64("best").unwrap(), Some(1234));
    }

    #[test]
    fn test_non_numeric_value_reads_none_as_int() {
        let mut store = MemoryStore::new();
        store.set_string("best", "not a number").unwrap();
        assert_eq!(store.get_i64("best").unwrap(), None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set_string("save", "x").unwrap();
        store.delete("save").unwrap();
        store.delete("save").unwrap();
        assert!(!store.contains("save").unwrap());
    }
}
