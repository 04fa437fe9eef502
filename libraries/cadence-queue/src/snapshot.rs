//! Queue snapshots and their persistence
//!
//! The engine does no I/O itself. A `QueueSnapshot` records what is needed
//! to rebuild the queue on the next launch (both orderings as song ids, the
//! current position and the modes). `SnapshotStore` is the persistence
//! adapter, and `SnapshotPersister` is an observer that keeps the stored
//! snapshot up to date as the queue changes.

use crate::error::{QueueError, Result};
use crate::types::{QueueChangeReason, RepeatMode, ShuffleMode};
use crate::view::QueueView;
use crate::watcher::QueueCallback;
use cadence_core::SongId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Persisted form of the queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSnapshot {
    /// Base order
    pub song_ids: Vec<SongId>,

    /// Shuffle order, if one was recorded
    pub shuffle_song_ids: Option<Vec<SongId>>,

    /// Current position in the ordering selected by `shuffle_mode`
    pub position: Option<usize>,

    pub shuffle_mode: ShuffleMode,

    pub repeat_mode: RepeatMode,
}

impl QueueSnapshot {
    /// Whether there is a queue to restore
    pub fn has_queue(&self) -> bool {
        !self.song_ids.is_empty() && self.position.is_some()
    }
}

/// Where snapshots are kept between launches
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot, if any
    fn load(&self) -> Result<Option<QueueSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, snapshot: &QueueSnapshot) -> Result<()>;
}

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<QueueSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `snapshot`
    pub fn with_snapshot(snapshot: QueueSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<QueueSnapshot>>> {
        self.snapshot
            .lock()
            .map_err(|_| QueueError::Persistence("snapshot lock poisoned".to_string()))
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<QueueSnapshot>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        *self.lock()? = Some(snapshot.clone());
        Ok(())
    }
}

/// Snapshot store backed by a JSON file
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<QueueSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&temp, &self.path)?;
        debug!(
            path = %self.path.display(),
            songs = snapshot.song_ids.len(),
            "Saved queue snapshot"
        );
        Ok(())
    }
}

/// Observer that saves a snapshot whenever the queue, position or modes change
///
/// Starts from whatever the store already holds, so mode changes applied
/// before the queue is restored don't overwrite the saved queue. Save
/// failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct SnapshotPersister<S> {
    store: S,
    latest: Mutex<QueueSnapshot>,
}

impl<S: SnapshotStore> SnapshotPersister<S> {
    pub fn new(store: S) -> Self {
        let latest = match store.load() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to load existing queue snapshot: {}", e);
                QueueSnapshot::default()
            }
        };

        Self {
            store,
            latest: Mutex::new(latest),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The most recent snapshot seen
    pub fn latest(&self) -> QueueSnapshot {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut QueueSnapshot)) {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut latest);

        if let Err(e) = self.store.save(&latest) {
            warn!("Failed to save queue snapshot: {}", e);
        }
    }
}

impl<S: SnapshotStore> QueueCallback for SnapshotPersister<S> {
    fn on_queue_changed(&self, queue: &QueueView<'_>, _reason: QueueChangeReason) {
        let snapshot = queue.snapshot();
        self.update(|latest| *latest = snapshot);
    }

    fn on_queue_position_changed(&self, _old_position: Option<usize>, new_position: Option<usize>) {
        self.update(|latest| latest.position = new_position);
    }

    fn on_shuffle_changed(&self, shuffle_mode: ShuffleMode) {
        self.update(|latest| latest.shuffle_mode = shuffle_mode);
    }

    fn on_repeat_changed(&self, repeat_mode: RepeatMode) {
        self.update(|latest| latest.repeat_mode = repeat_mode);
    }
}
