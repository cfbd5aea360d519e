//! Guard Module
//!
//! Per-table mutual exclusion for read-modify-write cycles.
//!
//! ## Responsibilities
//! - One exclusive lock per table file path
//! - Same-table cycles run one at a time, from read through write
//! - Different tables never block each other
//! - Optional deadline on lock acquisition
//!
//! ## Lock Table
//! ```text
//! PROCESS_LOCKS: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>
//!          │
//!          ├── /srv/data/shop/product.json ──► Mutex<()>  (held by cycle A)
//!          └── /srv/data/shop/order.json   ──► Mutex<()>  (held by cycle B)
//! ```
//! The outer mutex is held only to look up or drop an entry, never across
//! file I/O. Entries are removed once no cycle holds or waits for them.
//!
//! `TableLocks::shared` handles all use the one process-wide table, so every
//! `Engine` in the process excludes every other one on the same file as long
//! as callers key it by canonical path. `TableLocks::new` builds a private
//! table that only coordinates its own callers. Separate processes are not
//! coordinated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};

use crate::error::{Result, StoreError};

/// Lock per table path; an entry exists while a cycle holds or awaits it
type LockTable = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

/// Process-wide lock table behind `TableLocks::shared`
static PROCESS_LOCKS: Lazy<Arc<LockTable>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

/// Handle to a table of per-table locks
pub struct TableLocks {
    locks: Arc<LockTable>,

    /// Max time to wait for a table lock (None = wait forever)
    timeout: Option<Duration>,
}

impl TableLocks {
    /// Create a private, empty lock table
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Handle on the process-wide lock table
    ///
    /// The deadline belongs to the handle; the locks are shared with every
    /// other `shared` handle.
    pub fn shared(timeout: Option<Duration>) -> Self {
        Self {
            locks: Arc::clone(&PROCESS_LOCKS),
            timeout,
        }
    }

    /// Run `cycle` while holding the exclusive lock for `path`
    ///
    /// Fails with `StoreError::Timeout` (without running `cycle`) if the
    /// lock is not acquired within the configured deadline. Once acquired,
    /// `cycle` always runs to completion.
    pub fn with_lock<T>(&self, path: &Path, cycle: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.lock_for(path);

        let outcome = match self.acquire(&lock, path) {
            Ok(_held) => cycle(),
            Err(e) => Err(e),
        };

        self.release(path, lock);
        outcome
    }

    /// Number of tables with a live lock entry
    pub fn active_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Number of live lock entries for paths under `root`
    pub fn active_under(&self, root: &Path) -> usize {
        self.locks
            .lock()
            .keys()
            .filter(|path| path.starts_with(root))
            .count()
    }

    /// The configured acquisition deadline
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Get or insert the lock for `path`
    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(
            locks
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    fn acquire<'a>(&self, lock: &'a Mutex<()>, path: &Path) -> Result<MutexGuard<'a, ()>> {
        match self.timeout {
            None => Ok(lock.lock()),
            Some(timeout) => lock.try_lock_for(timeout).ok_or_else(|| {
                let waited_ms = timeout.as_millis() as u64;
                tracing::warn!(path = %path.display(), waited_ms, "table lock timed out");
                StoreError::Timeout {
                    path: path.to_path_buf(),
                    waited_ms,
                }
            }),
        }
    }

    /// Drop the registry entry if nobody else holds or awaits it
    fn release(&self, path: &Path, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        // Clones are only handed out under `locks`, so 2 = the map + ours.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(path);
        }
    }
}

impl Default for TableLocks {
    fn default() -> Self {
        Self::new(None)
    }
}
