//! Shuffle algorithms for queue randomization
//!
//! Pure random (Fisher-Yates) shuffles with an optional pinned first item,
//! restoring a persisted shuffle order from song ids, and `ShuffleJob`, which
//! lets the permutation be computed away from the thread that owns the queue.

use crate::item::QueueItem;
use cadence_core::{Song, SongId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

/// Random permutation of `0..len`, with `pinned` (if any) first
///
/// Keeping the playing item first means turning shuffle on neither restarts
/// nor skips it, and "next" continues from the top of the new order.
pub(crate) fn shuffled_indices<R: Rng>(
    len: usize,
    pinned: Option<usize>,
    rng: &mut R,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);

    if let Some(pinned) = pinned {
        if let Some(at) = order.iter().position(|&index| index == pinned) {
            order[..=at].rotate_right(1);
        }
    }
    order
}

/// Arrange `items` in the order their songs appear in `songs`
///
/// Each occurrence of a song in `songs` claims the next unclaimed item with
/// that song, so duplicates are matched in base order. Items left unclaimed
/// go last, in their original order.
pub(crate) fn order_by_songs<'a, I>(items: I, songs: &[Song]) -> Vec<QueueItem>
where
    I: IntoIterator<Item = &'a QueueItem>,
{
    let mut slots: HashMap<SongId, VecDeque<usize>> = HashMap::new();
    for (index, song) in songs.iter().enumerate() {
        slots.entry(song.id).or_default().push_back(index);
    }

    let mut keyed: Vec<(usize, &QueueItem)> = items
        .into_iter()
        .map(|item| {
            let slot = slots
                .get_mut(&item.song().id)
                .and_then(VecDeque::pop_front)
                .unwrap_or(usize::MAX);
            (slot, item)
        })
        .collect();

    // Stable, so unclaimed items keep their relative order
    keyed.sort_by_key(|(slot, _)| *slot);
    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// A shuffle to be computed off the owning thread
///
/// Captures only what the permutation depends on. The result is tagged with
/// the store generation it was prepared against, so it can be discarded if
/// the queue changed in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleJob {
    pub(crate) generation: u64,
    pub(crate) len: usize,
    pub(crate) pinned: Option<usize>,
}

impl ShuffleJob {
    /// Compute the permutation
    pub fn compute(self) -> ComputedShuffle {
        self.compute_with(&mut rand::thread_rng())
    }

    pub fn compute_with<R: Rng>(self, rng: &mut R) -> ComputedShuffle {
        ComputedShuffle {
            generation: self.generation,
            order: shuffled_indices(self.len, self.pinned, rng),
        }
    }

    /// Number of items the job will shuffle
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A finished shuffle, ready to be swapped in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedShuffle {
    pub(crate) generation: u64,
    pub(crate) order: Vec<usize>,
}
