//! Persistence adapters: durable get/set/remove of text values keyed by
//! a namespace string.
//!
//! The vault never talks to a storage backend directly; it is handed a
//! `Box<dyn Persistence>` at construction.  Three backends ship here:
//! - `MemoryStore`: in-process map, for tests and embedding (`memory`)
//! - `FileStore`: one owner-only file per key in a directory (`file`)
//! - `KeyringStore`: the OS credential store (`keyring`, feature
//!   `keyring-store`)

pub mod file;
pub mod memory;

#[cfg(feature = "keyring-store")]
pub mod keyring;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "keyring-store")]
pub use self::keyring::KeyringStore;

use crate::errors::Result;

/// A durable key-value store for the vault blob and its metadata.
///
/// Implementations must survive process restarts (except `MemoryStore`)
/// and must treat removing a missing key as success.
pub trait Persistence: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`.  Succeeds if it was already absent.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: Persistence + ?Sized> Persistence for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
