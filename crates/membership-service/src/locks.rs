//! Keyed async locks
//!
//! One mutex per key, created on first use and dropped again once no task
//! holds or waits on it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = HashMap<Uuid, Arc<Mutex<()>>>;

/// A set of async mutexes keyed by id.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    locks: StdMutex<LockMap>,
}

impl KeyedLocks {
    /// Create an empty lock set.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub(crate) async fn lock(&self, key: Uuid) -> KeyedLockGuard<'_> {
        let lock = {
            let mut locks = self.entries();
            locks.entry(key).or_default().clone()
        };

        // Built before awaiting so a cancelled wait still releases the entry.
        let mut guard = KeyedLockGuard {
            owner: self,
            key,
            lock: lock.clone(),
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    /// Number of keys currently tracked.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    fn entries(&self) -> MutexGuard<'_, LockMap> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to one key of a [`KeyedLocks`].
pub(crate) struct KeyedLockGuard<'a> {
    owner: &'a KeyedLocks,
    key: Uuid,
    lock: Arc<Mutex<()>>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.entries();
        self.held = None;

        // Clones are only handed out under the map lock, so two references
        // (the map's and ours) mean nobody else is holding or waiting.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}
