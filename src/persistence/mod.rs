//! Key-value persistence
//!
//! Features:
//! - Injectable string key-value store (`KeyValueStore`)
//! - In-memory, JSON file (native) and LocalStorage (WASM) backends
//! - `PersistentKeyedState`: a typed value bound to one named slot

mod error;
mod keyed;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use error::{FailureKind, PersistError, StoreError};
pub use keyed::PersistentKeyedState;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Durable string key-value store
///
/// Every write is a whole-value overwrite of one slot.
pub trait KeyValueStore {
    /// Read a slot; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a slot (absent keys are not an error)
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
