//! # FX Store
//!
//! Concrete key-value store implementations (adapters) for the converter.
//! This crate provides the adapters that implement the `KeyValueStore` port.

use fx_types::{KeyValueStore, StoreError};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Location string that selects the in-memory adapter.
pub const MEMORY_LOCATION: &str = ":memory:";

/// Unified store wrapper over the available adapters.
pub enum Store {
    Memory(MemoryStore),
    File(FileStore),
}

/// Build and initialize a store from a location.
///
/// `":memory:"` gives a throwaway store; anything else is a path to a JSON
/// file, loaded now if it exists and created on the first write otherwise.
///
/// # Examples
///
/// ```ignore
/// let store = build_store("/home/me/.local/share/fx-widget/session.json")?;
/// let scratch = build_store(":memory:")?;
/// ```
pub fn build_store(location: &str) -> anyhow::Result<Store> {
    if location == MEMORY_LOCATION {
        return Ok(Store::Memory(MemoryStore::new()));
    }
    Ok(Store::File(FileStore::open(location)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement KeyValueStore for Store (delegation)
// ─────────────────────────────────────────────────────────────────────────────

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Store::Memory(inner) => inner.get(key),
            Store::File(inner) => inner.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.set(key, value),
            Store::File(inner) => inner.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.remove(key),
            Store::File(inner) => inner.remove(key),
        }
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.apply(changes),
            Store::File(inner) => inner.apply(changes),
        }
    }
}
