//! Durable key/value storage for the session record.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store mirrors `{token, profile}` here so a session survives process
//! restarts. Backends: [`MemoryStorage`] (tests and embedded use; clones share
//! one map, which is how a restart is simulated), [`FileStorage`] (CLI), and
//! `BrowserStorage` over `localStorage` behind the `browser` feature.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal persistent key/value surface.
pub trait SessionStorage: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON object on disk, one string value per key.
///
/// Every write replaces the file through a sibling temp file and a rename, so
/// a crash mid-write leaves either the old or the new contents. Reads of a
/// file that is not valid JSON fail with [`StorageError::Json`]; the next
/// write replaces it.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let (mut entries, unreadable) = match self.read_all() {
            Ok(entries) => (entries, false),
            Err(StorageError::Json(err)) => {
                tracing::warn!(path = %self.path.display(), error = %err, "replacing unreadable storage file");
                (BTreeMap::new(), true)
            }
            Err(err) => return Err(err),
        };
        if apply(&mut entries) || unreadable {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(feature = "browser")]
pub use browser::BrowserStorage;

#[cfg(feature = "browser")]
mod browser {
    use super::{SessionStorage, StorageError};

    /// `window.localStorage` backend for the hydrated shell.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserStorage;

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".to_owned()))
    }

    fn js_error(err: &wasm_bindgen::JsValue) -> StorageError {
        StorageError::Unavailable(format!("{err:?}"))
    }

    impl SessionStorage for BrowserStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            local_storage()?.get_item(key).map_err(|e| js_error(&e))
        }

        fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            local_storage()?.set_item(key, value).map_err(|e| js_error(&e))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            local_storage()?.remove_item(key).map_err(|e| js_error(&e))
        }
    }
}
