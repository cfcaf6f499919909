//! Typed value bound to one storage slot

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{KeyValueStore, PersistError};

/// A typed value bound to one named slot of a `KeyValueStore`
///
/// Starts out holding `initial_value` with `is_loaded() == false`. The host
/// calls `load()` once the store is reachable (after the first render on
/// the web); only then is `value()` authoritative. Every `set`/`update`
/// changes the in-memory value first and then overwrites the slot. Load and
/// save failures are logged and never reach the caller.
///
/// Instances sharing a key do not coordinate: last writer wins.
#[derive(Debug)]
pub struct PersistentKeyedState<T, S> {
    key: String,
    value: T,
    store: S,
    loaded: bool,
}

impl<T, S> PersistentKeyedState<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(key: impl Into<String>, initial_value: T, store: S) -> Self {
        Self {
            key: key.into(),
            value: initial_value,
            store,
            loaded: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and parse the slot without touching the in-memory value
    ///
    /// An absent or empty slot is `Ok(None)`.
    pub fn try_load(&self) -> Result<Option<T>, PersistError> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(|source| PersistError::Read {
                key: self.key.clone(),
                source,
            })?;

        match raw {
            Some(json) if !json.is_empty() => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| PersistError::Parse {
                    key: self.key.clone(),
                    source,
                }),
            _ => Ok(None),
        }
    }

    /// Run the one-time load step
    ///
    /// Returns true when a persisted value replaced the current one. Calls
    /// after the first are no-ops.
    pub fn load(&mut self) -> bool {
        if self.loaded {
            log::debug!("Slot '{}' already loaded, skipping", self.key);
            return false;
        }

        let replaced = match self.try_load() {
            Ok(Some(value)) => {
                self.value = value;
                log::info!("Loaded slot '{}' from storage", self.key);
                true
            }
            Ok(None) => {
                log::info!("Slot '{}' is empty, keeping initial value", self.key);
                false
            }
            Err(e) => {
                log::warn!("{e}; keeping initial value");
                false
            }
        };

        self.loaded = true;
        replaced
    }

    /// Replace the value and write it through
    pub fn set(&mut self, value: T) {
        self.value = value;
        if let Err(e) = self.persist() {
            log::warn!("{e}; change kept in memory only");
        }
    }

    /// Derive the next value from the current one and write it through
    pub fn update<F>(&mut self, updater: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = updater(&self.value);
        self.set(next);
    }

    /// Serialize the current value and overwrite the slot
    pub fn persist(&self) -> Result<(), PersistError> {
        let json = serde_json::to_string(&self.value).map_err(|source| PersistError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.store
            .set(&self.key, &json)
            .map_err(|source| PersistError::Write {
                key: self.key.clone(),
                source,
            })?;
        log::debug!("Saved slot '{}' ({} bytes)", self.key, json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FailureKind, MemoryStore, StoreError};
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Store whose reads return `read` and whose writes always fail
    struct BrokenStore {
        read: Option<String>,
        reads: Cell<usize>,
    }

    impl BrokenStore {
        fn new(read: Option<&str>) -> Self {
            Self {
                read: read.map(str::to_string),
                reads: Cell::new(0),
            }
        }
    }

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            match &self.read {
                Some(raw) => Ok(Some(raw.clone())),
                None => Err(StoreError::Unavailable),
            }
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected("quota exceeded".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_starts_with_initial_value_unloaded() {
        let store = MemoryStore::with_slot("count", "7");
        let state = PersistentKeyedState::new("count", 1u32, store);
        assert_eq!(*state.value(), 1);
        assert!(!state.is_loaded());
    }

    #[test]
    fn test_load_replaces_value() {
        let store = MemoryStore::with_slot("count", "7");
        let mut state = PersistentKeyedState::new("count", 1u32, store);
        assert!(state.load());
        assert!(state.is_loaded());
        assert_eq!(*state.value(), 7);
    }

    #[test]
    fn test_load_absent_or_empty_keeps_initial() {
        let mut absent = PersistentKeyedState::new("count", 1u32, MemoryStore::new());
        assert!(!absent.load());
        assert!(absent.is_loaded());
        assert_eq!(*absent.value(), 1);

        let mut empty = PersistentKeyedState::new("count", 1u32, MemoryStore::with_slot("count", ""));
        assert!(!empty.load());
        assert!(empty.is_loaded());
        assert_eq!(*empty.value(), 1);
    }

    #[test]
    fn test_load_invalid_json_keeps_initial() {
        let store = MemoryStore::with_slot("count", "not json {");
        let mut state = PersistentKeyedState::new("count", 1u32, store);
        let err = state.try_load().unwrap_err();
        assert_eq!(err.kind(), FailureKind::Load);
        assert!(matches!(err, PersistError::Parse { .. }));

        assert!(!state.load());
        assert!(state.is_loaded());
        assert_eq!(*state.value(), 1);
    }

    #[test]
    fn test_load_read_failure_still_marks_loaded() {
        let mut state = PersistentKeyedState::new("count", 3u32, BrokenStore::new(None));
        assert!(!state.load());
        assert!(state.is_loaded());
        assert_eq!(*state.value(), 3);
    }

    #[test]
    fn test_load_runs_once() {
        let mut state = PersistentKeyedState::new("count", 0u32, BrokenStore::new(Some("5")));
        assert!(state.load());
        assert_eq!(*state.value(), 5);
        assert!(!state.load());
        assert_eq!(state.store().reads.get(), 1);
    }

    #[test]
    fn test_set_writes_through() {
        let store = MemoryStore::new();
        let mut state = PersistentKeyedState::new("count", 0u32, store.clone());
        state.load();
        state.set(42);
        assert_eq!(*state.value(), 42);
        assert_eq!(store.get("count").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_update_uses_current_value() {
        let store = MemoryStore::new();
        let mut state = PersistentKeyedState::new("list", vec![1u32], store.clone());
        state.update(|v| {
            let mut next = v.clone();
            next.push(2);
            next
        });
        state.update(|v| v.iter().map(|n| n * 10).collect());
        assert_eq!(state.value(), &vec![10, 20]);
        assert_eq!(store.get("list").unwrap().as_deref(), Some("[10,20]"));
    }

    #[test]
    fn test_write_failure_keeps_memory_value() {
        let mut state = PersistentKeyedState::new("count", 0u32, BrokenStore::new(Some("1")));
        state.load();
        state.set(9);
        assert_eq!(*state.value(), 9);
        state.update(|v| v + 1);
        assert_eq!(*state.value(), 10);

        let err = state.persist().unwrap_err();
        assert_eq!(err.kind(), FailureKind::Save);
        assert_eq!(err.key(), "count");
    }

    #[test]
    fn test_serialize_failure_keeps_memory_value() {
        // Tuple keys cannot become JSON object keys
        let store = MemoryStore::new();
        let mut state: PersistentKeyedState<HashMap<(u8, u8), u8>, _> =
            PersistentKeyedState::new("grid", HashMap::new(), store.clone());
        state.update(|m| {
            let mut next = m.clone();
            next.insert((1, 2), 3);
            next
        });
        assert_eq!(state.value().get(&(1, 2)), Some(&3));
        assert!(store.is_empty());
        assert!(matches!(
            state.persist(),
            Err(PersistError::Serialize { .. })
        ));
    }

    #[test]
    fn test_instances_sharing_a_key_last_writer_wins() {
        let store = MemoryStore::new();
        let mut a = PersistentKeyedState::new("count", 0u32, store.clone());
        let mut b = PersistentKeyedState::new("count", 0u32, store.clone());
        a.set(1);
        b.set(2);
        assert_eq!(*a.value(), 1);
        assert_eq!(store.get("count").unwrap().as_deref(), Some("2"));
    }
}
