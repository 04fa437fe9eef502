//! Read-only projection of the queue handed to observers

use crate::item::{QueueItem, QueueItemId};
use crate::snapshot::QueueSnapshot;
use crate::store::{Ordering, QueueStore};
use crate::types::{RepeatMode, ShuffleMode};
use cadence_core::SongId;

/// Immutable view of the queue at the moment of a notification
#[derive(Debug, Clone, Copy)]
pub struct QueueView<'a> {
    pub(crate) store: &'a QueueStore,
    pub(crate) shuffle_mode: ShuffleMode,
    pub(crate) repeat_mode: RepeatMode,
    pub(crate) current: Option<QueueItemId>,
}

impl<'a> QueueView<'a> {
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle_mode
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// The ordering selected by `mode`
    pub fn ordering(&self, mode: ShuffleMode) -> Ordering<'a> {
        self.store.ordering(mode)
    }

    /// The ordering selected by the current shuffle mode
    pub fn active(&self) -> Ordering<'a> {
        self.store.ordering(self.shuffle_mode)
    }

    /// Copy of the ordering selected by `mode`
    pub fn items(&self, mode: ShuffleMode) -> Vec<QueueItem> {
        self.store.get(mode)
    }

    /// Song ids of the ordering selected by `mode`
    pub fn song_ids(&self, mode: ShuffleMode) -> Vec<SongId> {
        self.ordering(mode).iter().map(|item| item.song().id).collect()
    }

    /// Position of the current item in the active ordering
    pub fn current_position(&self) -> Option<usize> {
        self.current.and_then(|id| self.active().position_of(id))
    }

    /// Everything needed to restore this queue later
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            song_ids: self.song_ids(ShuffleMode::Off),
            shuffle_song_ids: Some(self.song_ids(ShuffleMode::On)),
            position: self.current_position(),
            shuffle_mode: self.shuffle_mode,
            repeat_mode: self.repeat_mode,
        }
    }
}
