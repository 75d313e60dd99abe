#![forbid(unsafe_code)]

//! `window.localStorage` backend.

use folio_core::storage::{StorageBackend, StorageError, StorageResult};
use web_sys::{Storage, Window};

use super::describe;

const PROBE_KEY: &str = "__folio_probe__";

/// Browser local storage. Missing when the page runs with storage disabled;
/// every operation then reports [`StorageError::Unavailable`].
pub(crate) struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub(crate) fn open(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
    }
}

impl StorageBackend for LocalStorage {
    fn name(&self) -> &str {
        "LocalStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(describe(&e)))
    }

    /// Safari private mode exposes `localStorage` but throws on write.
    fn is_available(&self) -> bool {
        self.storage().is_ok_and(|s| {
            s.set_item(PROBE_KEY, "1").is_ok() && s.remove_item(PROBE_KEY).is_ok()
        })
    }
}
