//! In-memory storage backend.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! [`super::Storage`]. Ideal for unit tests and sessions that should not
//! touch the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{LedgerError, Result};

/// Thread-safe in-memory storage.
///
/// # Example
///
/// ```rust
/// use expense_ledger::ledger::LedgerStore;
/// use expense_ledger::storage::InMemoryStorage;
///
/// let store = LedgerStore::load(InMemoryStorage::new());
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// Slot values behind a single mutex.
    slots: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the slot lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> Result<R> {
        let mut slots = self.slots.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut slots))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage(err.to_string().into())
}

impl super::Storage for InMemoryStorage {
    #[inline]
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.with_lock(|slots| slots.get(key).cloned())
    }

    #[inline]
    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.with_lock(|slots| {
            let _previous = slots.insert(key.to_owned(), value.to_owned());
        })
    }
}
