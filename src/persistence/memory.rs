//! In-memory store

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{KeyValueStore, StoreError};

/// In-process store
///
/// Clones share the same slots, so a test can keep a handle and inspect
/// what a `PersistentKeyedState` wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one slot
    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
