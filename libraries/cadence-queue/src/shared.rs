//! Thread-safe handle to a queue manager
//!
//! The engine itself is single-owner. `SharedQueueManager` serializes all
//! access behind one mutex so that every operation, including the
//! notifications it emits, happens atomically with respect to other callers.
//!
//! Observers run while the lock is held and must not call back into the
//! same `SharedQueueManager`.

use crate::manager::QueueManager;
use crate::types::QueueConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Cloneable, lock-protected queue manager
#[derive(Debug, Clone)]
pub struct SharedQueueManager {
    inner: Arc<Mutex<QueueManager>>,
}

impl SharedQueueManager {
    pub fn new(manager: QueueManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self::new(QueueManager::new(config))
    }

    /// Run `f` with exclusive access to the manager
    pub fn with<T>(&self, f: impl FnOnce(&mut QueueManager) -> T) -> T {
        f(&mut self.lock())
    }

    /// Lock the manager
    ///
    /// A panic while the lock was held leaves the manager usable: every
    /// operation keeps it consistent before notifying observers, and
    /// observer panics are caught.
    pub fn lock(&self) -> MutexGuard<'_, QueueManager> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Queue lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Regenerate the shuffle order on a background thread
    ///
    /// The permutation is computed without holding the lock. The handle
    /// yields false if the queue changed in the meantime and the result was
    /// discarded.
    pub fn spawn_reshuffle(&self) -> JoinHandle<bool> {
        let job = self.lock().prepare_shuffle();
        let shared = self.clone();

        thread::spawn(move || {
            debug!("Computing shuffle for {} items", job.len());
            let computed = job.compute();
            shared.lock().apply_shuffle(computed)
        })
    }
}

impl Default for SharedQueueManager {
    fn default() -> Self {
        Self::new(QueueManager::default())
    }
}

impl From<QueueManager> for SharedQueueManager {
    fn from(manager: QueueManager) -> Self {
        Self::new(manager)
    }
}
