//! Restoring the queue on launch
//!
//! Restore runs in two steps. `RestorePlan::load` reads the saved snapshot
//! and resolves its song ids against the library; this is the only part
//! that awaits, and it never touches the engine. `RestorePlan::apply` then
//! installs the result synchronously. Dropping the load future (or an error
//! from it) therefore leaves the engine exactly as it was.

use crate::error::Result;
use crate::manager::QueueManager;
use crate::snapshot::{QueueSnapshot, SnapshotStore};
use crate::types::{QueueChangeReason, RepeatMode, ShuffleMode};
use cadence_core::{Song, SongId, SongRepository};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A saved queue with its songs resolved, ready to apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestorePlan {
    pub songs: Vec<Song>,
    pub shuffle_songs: Option<Vec<Song>>,

    /// Position in the active ordering, adjusted for songs that no longer
    /// resolve
    pub position: Option<usize>,

    pub shuffle_mode: ShuffleMode,
    pub repeat_mode: RepeatMode,
}

impl RestorePlan {
    /// Load the saved snapshot and resolve its songs
    ///
    /// Songs missing from the library are dropped from both orderings.
    pub async fn load<R, S>(repository: &R, store: &S) -> Result<Self>
    where
        R: SongRepository + ?Sized,
        S: SnapshotStore + ?Sized,
    {
        let Some(snapshot) = store.load()? else {
            debug!("No saved queue to restore");
            return Ok(Self::default());
        };
        Self::resolve(repository, snapshot).await
    }

    /// Resolve a snapshot's song ids against `repository`
    pub async fn resolve<R>(repository: &R, snapshot: QueueSnapshot) -> Result<Self>
    where
        R: SongRepository + ?Sized,
    {
        if !snapshot.has_queue() {
            debug!("Saved snapshot holds no queue, restoring modes only");
            return Ok(Self {
                shuffle_mode: snapshot.shuffle_mode,
                repeat_mode: snapshot.repeat_mode,
                ..Self::default()
            });
        }

        let mut seen = HashSet::new();
        let wanted: Vec<SongId> = snapshot
            .song_ids
            .iter()
            .chain(snapshot.shuffle_song_ids.iter().flatten())
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let found: HashMap<SongId, Song> = repository
            .songs_by_ids(&wanted)
            .await?
            .into_iter()
            .map(|song| (song.id, song))
            .collect();

        let lookup = |ids: &[SongId]| -> Vec<Song> {
            ids.iter().filter_map(|id| found.get(id).cloned()).collect()
        };

        let songs = lookup(&snapshot.song_ids);
        let shuffle_songs = snapshot.shuffle_song_ids.as_deref().map(lookup);

        let active_ids = match (&snapshot.shuffle_mode, &snapshot.shuffle_song_ids) {
            (ShuffleMode::On, Some(shuffle_ids)) => shuffle_ids.as_slice(),
            _ => snapshot.song_ids.as_slice(),
        };
        let position = snapshot.position.map(|position| {
            let dropped = active_ids
                .iter()
                .take(position)
                .filter(|id| !found.contains_key(*id))
                .count();
            position - dropped
        });

        let missing = snapshot.song_ids.len() - songs.len();
        if missing > 0 {
            info!("{} saved songs are no longer in the library", missing);
        }

        Ok(Self {
            songs,
            shuffle_songs,
            position,
            shuffle_mode: snapshot.shuffle_mode,
            repeat_mode: snapshot.repeat_mode,
        })
    }

    /// Install the plan into `manager`
    ///
    /// Applies the modes first, then the queue (if there is one), and
    /// signals that the queue has been restored either way. Returns true if
    /// a queue was installed.
    ///
    /// A manager that already has a queue (set while the plan was loading)
    /// is left alone, modes included, and false is returned.
    pub fn apply(self, manager: &mut QueueManager) -> bool {
        if manager.has_restored_queue() {
            info!("Queue already set, discarding saved queue");
            return false;
        }

        manager.set_shuffle_mode(self.shuffle_mode, false);
        manager.set_repeat_mode(self.repeat_mode);

        let restored = match self.position {
            Some(position) if !self.songs.is_empty() => {
                let position = position.min(self.songs.len() - 1);
                manager.set_queue_with_reason(
                    self.songs,
                    self.shuffle_songs,
                    position,
                    QueueChangeReason::Restore,
                )
            }
            _ => false,
        };

        manager.mark_queue_restored();
        info!("Queue restore finished ({} items)", manager.len());
        restored
    }
}

/// Load the saved queue and install it into `manager`
///
/// On error `manager` is left untouched.
pub async fn restore_queue<R, S>(
    manager: &mut QueueManager,
    repository: &R,
    store: &S,
) -> Result<bool>
where
    R: SongRepository + ?Sized,
    S: SnapshotStore + ?Sized,
{
    let plan = RestorePlan::load(repository, store).await?;
    Ok(plan.apply(manager))
}
