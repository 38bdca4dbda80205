//! Pluggable key-value storage for persisting ledger state.
//!
//! The ledger keeps its state in named slots, each holding one text value.
//! [`InMemoryStorage`] backs tests and ephemeral sessions; [`FileStorage`]
//! keeps one file per slot on disk.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use crate::error::Result;

/// Slot holding the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Slot holding the display theme.
pub const THEME_KEY: &str = "theme";

/// Key-value storage backend.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for mutation.
pub trait Storage: core::fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to read.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// The write is complete when this returns: either the new value or
    /// the previous one is stored, never a mix.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to write.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    #[inline]
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    #[inline]
    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}
