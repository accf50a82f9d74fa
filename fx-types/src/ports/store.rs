//! Key-value store port.
//!
//! Stands in for browser local storage: string keys, string values, survives
//! across sessions until explicitly cleared.

use crate::error::StoreError;

/// Keys the converter persists.
pub mod keys {
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const HAS_SUBSCRIPTION: &str = "hasSubscription";
    pub const USAGE_COUNT: &str = "usageCount";
    pub const CHART_USAGE_COUNT: &str = "chartUsageCount";
    pub const USER_EMAIL: &str = "userEmail";
    pub const PLAN: &str = "plan";
}

/// Synchronous string store.
///
/// Implementations use interior mutability; a single service call performs
/// its read-modify-write without interleaving.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Applies a batch of changes all at once: `Some` sets a key, `None`
    /// removes it. On error none of the changes are visible.
    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        (**self).apply(changes)
    }
}
