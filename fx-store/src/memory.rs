//! In-memory store, for tests and `:memory:` sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use fx_types::{KeyValueStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Io("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        for (key, value) in changes {
            match value {
                Some(value) => entries.insert(key.to_string(), value.to_string()),
                None => entries.remove(*key),
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("usageCount").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("usageCount", "1").unwrap();
        store.set("usageCount", "2").unwrap();
        assert_eq!(store.get("usageCount").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_apply_batch() {
        let store = MemoryStore::new();
        store.set("userEmail", "a@b.c").unwrap();
        store
            .apply(&[("isLoggedIn", Some("false")), ("userEmail", None)])
            .unwrap();
        assert_eq!(store.get("isLoggedIn").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("userEmail").unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.set("plan", "monthly").unwrap();
        store.remove("plan").unwrap();
        store.remove("plan").unwrap();
        assert_eq!(store.get("plan").unwrap(), None);
    }
}
