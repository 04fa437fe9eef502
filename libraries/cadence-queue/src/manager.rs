//! Queue manager - core orchestration
//!
//! Owns the shuffle and repeat modes and the current item, validates
//! arguments, delegates list mutations to `QueueStore` and decides which
//! notifications each operation emits.
//!
//! Nothing here returns an error: invalid arguments give `false`, and
//! positions that don't exist (end of queue, no current item) give `None`.

use crate::item::QueueItem;
use crate::shuffle::{order_by_songs, ComputedShuffle, ShuffleJob};
use crate::snapshot::QueueSnapshot;
use crate::store::{Ordering, QueueStore};
use crate::types::{QueueChangeReason, QueueConfig, RepeatMode, ShuffleMode};
use crate::view::QueueView;
use crate::watcher::{QueueCallback, QueueWatcher};
use cadence_core::Song;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// The playback queue engine
///
/// Meant to be owned by a single thread or task. To share it, wrap it in
/// `SharedQueueManager`, which puts the whole engine behind one lock.
#[derive(Debug)]
pub struct QueueManager {
    config: QueueConfig,
    shuffle_mode: ShuffleMode,
    repeat_mode: RepeatMode,
    store: QueueStore,
    current_item: Option<QueueItem>,
    has_restored_queue: bool,
    watcher: QueueWatcher,
}

impl QueueManager {
    /// Create an empty queue
    pub fn new(config: QueueConfig) -> Self {
        Self {
            shuffle_mode: config.shuffle_mode,
            repeat_mode: config.repeat_mode,
            config,
            store: QueueStore::new(),
            current_item: None,
            has_restored_queue: false,
            watcher: QueueWatcher::new(),
        }
    }

    pub fn add_callback(&mut self, callback: Arc<dyn QueueCallback>) -> bool {
        self.watcher.add_callback(callback)
    }

    pub fn remove_callback<C: QueueCallback + ?Sized>(&mut self, callback: &Arc<C>) -> bool {
        self.watcher.remove_callback(callback)
    }

    // ===== Queue replacement =====

    /// Replace the queue
    ///
    /// `shuffle_songs` restores a previously persisted shuffle order; without
    /// it a new shuffle order is generated with the new current item first.
    /// `position` selects the current item and must be in `0..songs.len()`.
    /// Returns true if the queue was set and is non-empty; on an invalid
    /// position nothing changes and false is returned.
    pub fn set_queue(
        &mut self,
        songs: Vec<Song>,
        shuffle_songs: Option<Vec<Song>>,
        position: usize,
    ) -> bool {
        self.set_queue_with_reason(songs, shuffle_songs, position, QueueChangeReason::Default)
    }

    pub(crate) fn set_queue_with_reason(
        &mut self,
        songs: Vec<Song>,
        shuffle_songs: Option<Vec<Song>>,
        position: usize,
        reason: QueueChangeReason,
    ) -> bool {
        if position >= songs.len() {
            warn!(
                "Invalid queue position: {} (songs: {})",
                position,
                songs.len()
            );
            return false;
        }

        if shuffle_songs.is_none() && !self.config.retain_shuffle_on_new_queue {
            self.set_shuffle_mode(ShuffleMode::Off, false);
        }

        let previous_order = self.active().ids();

        let base_unchanged = self.store.len() == songs.len()
            && self
                .store
                .ordering(ShuffleMode::Off)
                .iter()
                .zip(&songs)
                .all(|(item, song)| item.song().id == song.id);

        if base_unchanged {
            trace!("set_queue(): base order unchanged, keeping existing items");
        } else {
            self.store
                .set_base(songs.into_iter().map(QueueItem::new).collect());
        }

        let mut current_id = self
            .store
            .ordering(ShuffleMode::Off)
            .get(position)
            .map(QueueItem::id);

        match shuffle_songs {
            Some(shuffle_songs) => {
                let base = self.store.ordering(ShuffleMode::Off);
                let order = order_by_songs(base.iter(), &shuffle_songs);
                self.store.set_shuffle(&order);
                if self.shuffle_mode == ShuffleMode::On {
                    current_id = self
                        .store
                        .ordering(ShuffleMode::On)
                        .get(position)
                        .map(QueueItem::id);
                }
            }
            None => self.store.generate_shuffle(current_id),
        }

        if self.active().ids() != previous_order {
            self.notify_queue_changed(reason);
        }

        let current = current_id.and_then(|id| {
            self.store
                .ordering(ShuffleMode::Off)
                .iter()
                .find(|item| item.id() == id)
                .cloned()
        });
        if let Some(item) = current {
            debug!("Current item is {}", item.song().name);
            self.set_current_item(&item);
        }

        self.mark_queue_restored();

        !self.store.is_empty()
    }

    /// Empty both orderings and forget the current item
    pub fn clear(&mut self) {
        debug!("clear()");
        self.store.clear();
        self.current_item = None;
        self.notify_queue_changed(QueueChangeReason::Default);
    }

    // ===== Current item =====

    /// Make `item` the current item
    ///
    /// No-op if it already is. Otherwise flags it current (and the previous
    /// item not current) and announces the old and new positions.
    pub fn set_current_item(&mut self, item: &QueueItem) {
        if self.current_item.as_ref().map(QueueItem::id) == Some(item.id()) {
            trace!("set_current_item(): item already current");
            return;
        }

        let old_position = self.current_position();

        if let Some(previous) = self.current_item.take() {
            self.store
                .replace(previous.id(), previous.clone_with_current(false));
        }

        let current = item.clone_with_current(true);
        if !self.store.replace(item.id(), current.clone()) {
            warn!("set_current_item(): {} is not in the queue", item.song().name);
        }
        self.current_item = Some(current);

        self.watcher
            .on_queue_position_changed(old_position, self.current_position());
    }

    pub fn current_item(&self) -> Option<&QueueItem> {
        self.current_item.as_ref()
    }

    /// Position of the current item in the active ordering
    ///
    /// `None` when there is no current item or it is no longer in the queue.
    pub fn current_position(&self) -> Option<usize> {
        let current = self.current_item.as_ref()?;
        self.active().position_of(current.id())
    }

    // ===== Navigation =====

    /// The item after the current one, per the repeat mode
    ///
    /// `ignore_repeat` behaves as if repeat mode were `All`.
    pub fn get_next(&self, ignore_repeat: bool) -> Option<QueueItem> {
        let repeat_mode = if ignore_repeat {
            RepeatMode::All
        } else {
            self.repeat_mode
        };

        let active = self.active();
        let index = self.current_position()?;

        match repeat_mode {
            RepeatMode::Off => active.get(index + 1).cloned(),
            RepeatMode::All => {
                if index + 1 == active.len() {
                    active.get(0).cloned()
                } else {
                    active.get(index + 1).cloned()
                }
            }
            RepeatMode::One => self.current_item.clone(),
        }
    }

    /// The item before the current one; no wraparound
    pub fn get_previous(&self) -> Option<QueueItem> {
        let index = self.current_position()?;
        self.active().get(index.checked_sub(1)?).cloned()
    }

    /// Advance to the next item
    ///
    /// Returns false (and changes nothing) if there is no next item.
    pub fn skip_to_next(&mut self, ignore_repeat: bool) -> bool {
        trace!("skip_to_next()");
        match self.get_next(ignore_repeat) {
            Some(next) => {
                self.set_current_item(&next);
                true
            }
            None => {
                debug!("No next item to skip to");
                false
            }
        }
    }

    pub fn skip_to_previous(&mut self) -> bool {
        trace!("skip_to_previous()");
        match self.get_previous() {
            Some(previous) => {
                self.set_current_item(&previous);
                true
            }
            None => {
                debug!("No previous item to skip to");
                false
            }
        }
    }

    /// Make the item at `position` in the active ordering current
    pub fn skip_to(&mut self, position: usize) -> bool {
        match self.active().get(position).cloned() {
            Some(item) => {
                self.set_current_item(&item);
                true
            }
            None => {
                warn!("Couldn't skip to position {}, no item there", position);
                false
            }
        }
    }

    // ===== Mutation =====

    /// Append songs to the end of the queue
    ///
    /// In shuffle order they land at random positions after the current item.
    pub fn add_to_queue(&mut self, songs: Vec<Song>) {
        let shuffle_floor = self
            .current_item
            .as_ref()
            .and_then(|current| self.store.ordering(ShuffleMode::On).position_of(current.id()))
            .map_or(0, |position| position + 1);

        self.store
            .add(songs.into_iter().map(QueueItem::new).collect(), shuffle_floor);
        self.notify_queue_changed(QueueChangeReason::Default);
    }

    /// Insert songs right after the current item (or at the front if none)
    pub fn add_to_next(&mut self, songs: Vec<Song>) {
        let position = self.current_position().map_or(0, |position| position + 1);
        self.store
            .insert(position, songs.into_iter().map(QueueItem::new).collect());
        self.notify_queue_changed(QueueChangeReason::Default);
    }

    /// Remove items from the queue
    ///
    /// Queue-changed is always announced, even if none of the items were
    /// queued. If the current item is removed, the item that takes its place
    /// in the active ordering (or the new last item) becomes current, and a
    /// position change is always announced.
    pub fn remove(&mut self, items: &[QueueItem]) {
        let ids: Vec<_> = items.iter().map(QueueItem::id).collect();
        let old_position = self.current_position();
        let current_removed = self
            .current_item
            .as_ref()
            .is_some_and(|current| ids.contains(&current.id()));

        if self.store.remove(&ids) == 0 {
            trace!("remove(): none of the items are in the queue");
        }

        if current_removed {
            self.current_item = None;
            let replacement = old_position.and_then(|old| {
                let last = self.store.len().checked_sub(1)?;
                self.active().get(old.min(last)).cloned()
            });
            if let Some(item) = replacement {
                let current = item.clone_with_current(true);
                self.store.replace(item.id(), current.clone());
                self.current_item = Some(current);
            }
        }

        self.notify_queue_changed(QueueChangeReason::Default);

        let new_position = self.current_position();
        if current_removed || new_position != old_position {
            self.watcher
                .on_queue_position_changed(old_position, new_position);
        }
    }

    /// Move the item at `from` to `to` within the active ordering
    ///
    /// Returns false if either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.store.len();
        if from >= len || to >= len {
            warn!("Invalid move: {} -> {} (queue size: {})", from, to, len);
            return false;
        }

        let old_position = self.current_position();
        self.store.move_item(from, to, self.shuffle_mode);
        let new_position = self.current_position();

        self.notify_queue_changed(QueueChangeReason::Move);
        if new_position != old_position {
            self.watcher
                .on_queue_position_changed(old_position, new_position);
        }
        true
    }

    /// Move `item` so it plays right after the current item
    ///
    /// Returns false if there is no current item, `item` is the current
    /// item, or it is not in the queue.
    pub fn play_next(&mut self, item: &QueueItem) -> bool {
        let Some(current) = self.current_position() else {
            return false;
        };
        let Some(from) = self.active().position_of(item.id()) else {
            return false;
        };
        if from == current {
            return false;
        }

        let to = if from < current { current } else { current + 1 };
        self.move_item(from, to)
    }

    // ===== Modes =====

    pub fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle_mode
    }

    /// Change the shuffle mode
    ///
    /// With `reshuffle`, turning shuffle on regenerates the shuffle order
    /// with the current item first.
    pub fn set_shuffle_mode(&mut self, shuffle_mode: ShuffleMode, reshuffle: bool) {
        if self.shuffle_mode == shuffle_mode {
            return;
        }

        let previous_position = self.current_position();
        self.shuffle_mode = shuffle_mode;
        self.watcher.on_shuffle_changed(shuffle_mode);

        if shuffle_mode == ShuffleMode::On && reshuffle {
            let pinned = self.current_item.as_ref().map(QueueItem::id);
            self.store.generate_shuffle(pinned);
        }

        if self.has_restored_queue {
            // The active ordering switched
            self.notify_queue_changed(QueueChangeReason::Default);

            let position = self.current_position();
            if position != previous_position {
                self.watcher
                    .on_queue_position_changed(previous_position, position);
            }
        }
    }

    /// Turning shuffle on reshuffles with the current item first
    pub fn toggle_shuffle_mode(&mut self) {
        let shuffle_mode = self.shuffle_mode.toggled();
        self.set_shuffle_mode(shuffle_mode, shuffle_mode == ShuffleMode::On);
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn set_repeat_mode(&mut self, repeat_mode: RepeatMode) {
        if self.repeat_mode != repeat_mode {
            self.repeat_mode = repeat_mode;
            self.watcher.on_repeat_changed(repeat_mode);
        }
    }

    /// Off -> All -> One -> Off
    pub fn toggle_repeat_mode(&mut self) {
        self.set_repeat_mode(self.repeat_mode.cycled());
    }

    // ===== Off-thread shuffle =====

    /// Capture what a shuffle of the current queue needs
    ///
    /// Compute the job anywhere, then hand the result to `apply_shuffle`.
    pub fn prepare_shuffle(&self) -> ShuffleJob {
        ShuffleJob {
            generation: self.store.generation(),
            len: self.store.len(),
            pinned: self
                .current_item
                .as_ref()
                .and_then(|current| self.store.base_index_of(current.id())),
        }
    }

    /// Swap in a computed shuffle order
    ///
    /// Discarded (returns false) if the queue changed since the job was
    /// prepared.
    pub fn apply_shuffle(&mut self, shuffle: ComputedShuffle) -> bool {
        if shuffle.generation != self.store.generation() {
            debug!("Discarding stale shuffle; queue changed while it was computed");
            return false;
        }

        let previous_position = self.current_position();
        if !self.store.install_shuffle(shuffle.order) {
            return false;
        }

        if self.shuffle_mode == ShuffleMode::On && self.has_restored_queue {
            self.notify_queue_changed(QueueChangeReason::Default);

            let position = self.current_position();
            if position != previous_position {
                self.watcher
                    .on_queue_position_changed(previous_position, position);
            }
        }
        true
    }

    /// Regenerate the shuffle order with the current item first
    pub fn regenerate_shuffle(&mut self) -> bool {
        let job = self.prepare_shuffle();
        self.apply_shuffle(job.compute())
    }

    // ===== Queries =====

    /// Copy of the active ordering
    pub fn get_queue(&self) -> Vec<QueueItem> {
        self.store.get(self.shuffle_mode)
    }

    /// Copy of the ordering selected by `shuffle_mode`
    pub fn get_queue_for(&self, shuffle_mode: ShuffleMode) -> Vec<QueueItem> {
        self.store.get(shuffle_mode)
    }

    /// Borrowed view of the ordering selected by `shuffle_mode`
    pub fn ordering(&self, shuffle_mode: ShuffleMode) -> Ordering<'_> {
        self.store.ordering(shuffle_mode)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Everything needed to restore this queue on the next launch
    pub fn snapshot(&self) -> QueueSnapshot {
        self.view().snapshot()
    }

    // ===== Restore =====

    pub fn has_restored_queue(&self) -> bool {
        self.has_restored_queue
    }

    /// Record that the initial restore is done
    ///
    /// Announced once; later calls do nothing.
    pub fn mark_queue_restored(&mut self) {
        if !self.has_restored_queue {
            self.has_restored_queue = true;
            info!("Queue restored ({} items)", self.store.len());
            self.watcher.on_queue_restored();
        }
    }

    // ===== Internal =====

    /// The ordering selected by the current shuffle mode
    ///
    /// Every read and write that depends on the mode goes through here.
    fn active(&self) -> Ordering<'_> {
        self.store.ordering(self.shuffle_mode)
    }

    fn view(&self) -> QueueView<'_> {
        QueueView {
            store: &self.store,
            shuffle_mode: self.shuffle_mode,
            repeat_mode: self.repeat_mode,
            current: self.current_item.as_ref().map(QueueItem::id),
        }
    }

    fn notify_queue_changed(&self, reason: QueueChangeReason) {
        self.watcher.on_queue_changed(&self.view(), reason);
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}
