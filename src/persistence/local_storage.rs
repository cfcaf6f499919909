//! Browser LocalStorage store

use web_sys::Storage;

use super::{KeyValueStore, StoreError};

/// Browser `window.localStorage`
///
/// The handle is looked up on every call: storage can be missing entirely
/// (privacy modes, sandboxed frames) and that is reported as `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Rejected(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected(format!("{e:?}")))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Rejected(format!("{e:?}")))
    }
}
