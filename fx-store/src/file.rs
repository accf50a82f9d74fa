//! JSON-file store.
//!
//! The whole store is one flat JSON object of string values. Every write
//! rewrites the file through a sibling temp file and a rename, so a crash
//! leaves either the old or the new contents on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use fx_types::{KeyValueStore, StoreError};

pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading it if the file exists.
    ///
    /// A body that is not a JSON object starts an empty store, and non-string
    /// values are skipped; both are logged. Only an unreadable file is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;
            decode_entries(&path, &raw)
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened session store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Io("file store lock poisoned".into()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body).map_err(|e| StoreError::Io(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

/// Keeps the string entries of a JSON object body.
fn decode_entries(path: &Path, raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }

    let object: Map<String, Value> = match serde_json::from_str(raw) {
        Ok(object) => object,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable session file, starting empty");
            return BTreeMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(value) => Some((key, value)),
            other => {
                tracing::warn!(path = %path.display(), %key, value = %other, "skipping non-string session value");
                None
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(&[(key, Some(value))])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(&[(key, None)])
    }

    /// Writes the changed map to disk first; memory follows only on success.
    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        let mut entries = self.lock()?;

        let mut next = entries.clone();
        for (key, value) in changes {
            match value {
                Some(value) => next.insert(key.to_string(), value.to_string()),
                None => next.remove(*key),
            };
        }
        if next == *entries {
            return Ok(());
        }

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
