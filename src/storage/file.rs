//! File-based storage backend.
//!
//! Stores each slot in its own file under a configurable directory
//! (default: `$XDG_DATA_HOME/expense-ledger/`).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{LedgerError, Result};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "expense-ledger";

/// Extension given to slot files.
const SLOT_EXTENSION: &str = "slot";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed storage that keeps one file per slot.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Reads acquire a shared lock, writes an exclusive lock. Writes go to a
/// temporary file that is then renamed over the slot file, so a crash
/// mid-write leaves the previous value intact.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   transactions.slot
///   theme.slot
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory containing all slot files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist. Also
    /// opens (or creates) the `storage.lock` sentinel file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file storage");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/expense-ledger/` (typically
    /// `~/.local/share/expense-ledger/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                LedgerError::Storage("could not determine platform data directory".into())
            })
    }

    /// Returns the directory this storage writes to.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the slot file path for `key`, rejecting keys that could
    /// escape the storage directory.
    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(LedgerError::Storage(
                format!("invalid slot key: {key:?}").into(),
            ));
        }
        Ok(self.dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`LedgerError::Storage`].
fn storage_io_error(err: std::io::Error) -> LedgerError {
    LedgerError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`LedgerError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> LedgerError {
    LedgerError::Storage(err.to_string().into())
}

impl super::Storage for FileStorage {
    #[inline]
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        self.with_shared_lock(|| match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        })
    }

    #[inline]
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let tmp_path = path.with_extension(format!("{SLOT_EXTENSION}.tmp"));
        self.with_exclusive_lock(|| {
            fs::write(&tmp_path, value).map_err(storage_io_error)?;
            fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
            tracing::trace!(path = %path.display(), bytes = value.len(), "wrote slot");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::storage::Storage;

    /// Helper to create a [`FileStorage`] in a temporary directory.
    fn temp_storage() -> (FileStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (storage, dir)
    }

    #[test]
    fn missing_slot_reads_none() {
        let (storage, _dir) = temp_storage();
        assert!(storage.read("transactions").unwrap().is_none());
    }

    #[test]
    fn write_and_read_slot() {
        let (storage, _dir) = temp_storage();
        storage.write("theme", "dark").unwrap();
        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("dark"));
        assert!(storage.slot_path("theme").unwrap().exists());
    }

    #[test]
    fn write_replaces_existing() {
        let (storage, _dir) = temp_storage();
        storage.write("transactions", "[1]").unwrap();
        storage.write("transactions", "[]").unwrap();
        assert_eq!(storage.read("transactions").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn no_temporary_file_left_behind() {
        let (storage, dir) = temp_storage();
        storage.write("transactions", "[]").unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path().to_path_buf())
            .unwrap()
            .write("theme", "dark")
            .unwrap();
        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.read("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn rejects_path_like_keys() {
        let (storage, _dir) = temp_storage();
        for key in ["", "../escape", "a/b", "with space"] {
            let err = storage.write(key, "x").unwrap_err();
            assert!(matches!(err, LedgerError::Storage(_)), "key {key:?}");
        }
    }

    #[test]
    fn default_dir_returns_path() {
        // Just verify it doesn't error on supported platforms.
        let dir = FileStorage::default_dir();
        assert!(dir.is_ok());
    }

    #[test]
    fn lockfile_created_on_construction() {
        let (storage, _dir) = temp_storage();
        assert!(storage.dir().join(LOCK_FILE).exists());
    }

    #[test]
    fn concurrent_writes_are_safe() {
        let (storage, _dir) = temp_storage();
        let storage = Arc::new(storage);

        let handles: Vec<_> = (0..8)
            .map(|thread_idx| {
                let storage = Arc::clone(&storage);
                thread::spawn(move || {
                    for item_idx in 0..20 {
                        storage
                            .write("transactions", &format!("[{thread_idx},{item_idx}]"))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let contents = storage.read("transactions").unwrap().unwrap();
        assert!(contents.starts_with('[') && contents.ends_with(",19]"));
    }
}
