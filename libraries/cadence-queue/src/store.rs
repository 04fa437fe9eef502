//! Dual-ordering queue storage
//!
//! Holds the base order and the shuffle order of the same items. Items are
//! stored once, in base order; the shuffle order is a permutation of their
//! indices. Both orderings therefore always contain exactly the same items,
//! and every mutation here only has to keep the permutation a bijection.
//!
//! ```text
//! items:   [A, B, C, D]      base order:    A B C D
//! shuffle: [2, 0, 3, 1]      shuffle order: C A D B
//! ```
//!
//! The store knows nothing about modes or the current item; index
//! validation is the caller's job.

use crate::item::{QueueItem, QueueItemId};
use crate::shuffle::shuffled_indices;
use crate::types::ShuffleMode;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Base and shuffle orderings over one set of queue items
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    /// Items in base order
    items: Vec<QueueItem>,

    /// Shuffle order, as indices into `items`
    shuffle: Vec<usize>,

    /// Bumped on every mutation
    generation: u64,
}

/// Read-only view of one ordering
#[derive(Debug, Clone, Copy)]
pub struct Ordering<'a> {
    store: &'a QueueStore,
    mode: ShuffleMode,
}

impl<'a> Ordering<'a> {
    pub fn mode(&self) -> ShuffleMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.store.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.items.is_empty()
    }

    /// Item at `position` in this ordering
    pub fn get(&self, position: usize) -> Option<&'a QueueItem> {
        let items = &self.store.items;
        match self.mode {
            ShuffleMode::Off => items.get(position),
            ShuffleMode::On => self.store.shuffle.get(position).map(|&i| &items[i]),
        }
    }

    /// Position of the item with `id` in this ordering
    pub fn position_of(&self, id: QueueItemId) -> Option<usize> {
        self.iter().position(|item| item.id() == id)
    }

    pub fn iter(self) -> impl Iterator<Item = &'a QueueItem> + 'a {
        (0..self.len()).filter_map(move |position| self.get(position))
    }

    /// Copy of this ordering
    pub fn to_vec(&self) -> Vec<QueueItem> {
        self.iter().cloned().collect()
    }

    /// Item ids in this ordering
    pub fn ids(&self) -> Vec<QueueItemId> {
        self.iter().map(QueueItem::id).collect()
    }
}

impl QueueStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items (identical for both orderings)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mutation counter, used to detect stale off-thread shuffles
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// View one ordering
    pub fn ordering(&self, mode: ShuffleMode) -> Ordering<'_> {
        Ordering { store: self, mode }
    }

    /// Copy of one ordering
    pub fn get(&self, mode: ShuffleMode) -> Vec<QueueItem> {
        self.ordering(mode).to_vec()
    }

    /// Index of the item with `id` in base order
    pub fn base_index_of(&self, id: QueueItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Replace the base order wholesale
    ///
    /// The shuffle order is reset to the base order; callers follow up with
    /// `set_shuffle` or `generate_shuffle`.
    pub fn set_base(&mut self, items: Vec<QueueItem>) {
        self.shuffle = (0..items.len()).collect();
        self.items = items;
        self.touch();
    }

    /// Replace the shuffle order wholesale
    ///
    /// Items are matched to the base order by id. Ids not in the base order
    /// are ignored, and base items missing from `order` keep their base
    /// order at the end.
    pub fn set_shuffle(&mut self, order: &[QueueItem]) {
        let index_of: HashMap<QueueItemId, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id(), index))
            .collect();

        let mut used = vec![false; self.items.len()];
        let mut shuffle = Vec::with_capacity(self.items.len());

        for index in order.iter().filter_map(|item| index_of.get(&item.id())) {
            if !used[*index] {
                used[*index] = true;
                shuffle.push(*index);
            }
        }
        shuffle.extend((0..self.items.len()).filter(|&index| !used[index]));

        self.shuffle = shuffle;
        self.touch();
    }

    /// Regenerate the shuffle order as a random permutation of the base order
    ///
    /// If `pinned` is in the queue it is moved to the front.
    pub fn generate_shuffle(&mut self, pinned: Option<QueueItemId>) {
        self.generate_shuffle_with(pinned, &mut rand::thread_rng());
    }

    pub fn generate_shuffle_with<R: Rng>(
        &mut self,
        pinned: Option<QueueItemId>,
        rng: &mut R,
    ) {
        let pinned = pinned.and_then(|id| self.base_index_of(id));
        self.shuffle = shuffled_indices(self.items.len(), pinned, rng);
        self.touch();
    }

    /// Swap in a precomputed shuffle order
    ///
    /// Rejected unless `order` is a permutation of this store's indices.
    pub(crate) fn install_shuffle(&mut self, order: Vec<usize>) -> bool {
        if order.len() != self.items.len() {
            return false;
        }
        let mut seen = vec![false; order.len()];
        for &index in &order {
            if index >= seen.len() || seen[index] {
                return false;
            }
            seen[index] = true;
        }

        self.shuffle = order;
        self.touch();
        true
    }

    /// Append items to the base order
    ///
    /// In the shuffle order each new item lands at a random position at or
    /// after `shuffle_floor`.
    pub fn add(&mut self, items: Vec<QueueItem>, shuffle_floor: usize) {
        self.add_with(items, shuffle_floor, &mut rand::thread_rng());
    }

    pub fn add_with<R: Rng>(
        &mut self,
        items: Vec<QueueItem>,
        shuffle_floor: usize,
        rng: &mut R,
    ) {
        let start = self.items.len();
        self.items.extend(items);

        for index in start..self.items.len() {
            let floor = shuffle_floor.min(self.shuffle.len());
            let at = rng.gen_range(floor..=self.shuffle.len());
            self.shuffle.insert(at, index);
        }
        self.touch();
    }

    /// Insert items at `position` in both orderings
    ///
    /// `position` is clamped to the queue length.
    pub fn insert(&mut self, position: usize, items: Vec<QueueItem>) {
        let position = position.min(self.items.len());
        let count = items.len();
        if count == 0 {
            return;
        }

        for index in &mut self.shuffle {
            if *index >= position {
                *index += count;
            }
        }
        let tail = self.items.split_off(position);
        self.items.extend(items);
        self.items.extend(tail);

        let tail = self.shuffle.split_off(position);
        self.shuffle.extend(position..position + count);
        self.shuffle.extend(tail);
        self.touch();
    }

    /// Remove items (by id) from both orderings
    ///
    /// Returns how many items were removed.
    pub fn remove(&mut self, ids: &[QueueItemId]) -> usize {
        let ids: HashSet<QueueItemId> = ids.iter().copied().collect();

        let mut remap = Vec::with_capacity(self.items.len());
        let mut next = 0;
        for item in &self.items {
            if ids.contains(&item.id()) {
                remap.push(None);
            } else {
                remap.push(Some(next));
                next += 1;
            }
        }

        let removed = self.items.len() - next;
        if removed == 0 {
            return 0;
        }

        self.items.retain(|item| !ids.contains(&item.id()));
        self.shuffle = self.shuffle.iter().filter_map(|&index| remap[index]).collect();
        self.touch();
        removed
    }

    /// Substitute the item with `old` id in place, in both orderings
    ///
    /// Returns false if no item has that id.
    pub fn replace(&mut self, old: QueueItemId, new: QueueItem) -> bool {
        match self.base_index_of(old) {
            Some(index) => {
                self.items[index] = new;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Move one item within a single ordering
    ///
    /// The other ordering keeps its sequence.
    pub fn move_item(&mut self, from: usize, to: usize, mode: ShuffleMode) {
        let len = self.items.len();
        if from >= len || to >= len || from == to {
            return;
        }

        match mode {
            ShuffleMode::Off => {
                let item = self.items.remove(from);
                self.items.insert(to, item);

                for index in &mut self.shuffle {
                    if *index == from {
                        *index = to;
                    } else if from < to {
                        if *index > from && *index <= to {
                            *index -= 1;
                        }
                    } else if *index >= to && *index < from {
                        *index += 1;
                    }
                }
            }
            ShuffleMode::On => {
                let index = self.shuffle.remove(from);
                self.shuffle.insert(to, index);
            }
        }
        self.touch();
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.items.clear();
        self.shuffle.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
