//! Queue items
//!
//! A `QueueItem` gives a song an identity inside the queue, so the same song
//! can be queued twice and the two entries still be told apart.

use cadence_core::Song;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Queue item identifier, unique per entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueItemId(Uuid);

impl QueueItemId {
    /// Generate a new random item ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for QueueItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A song's slot in the queue
///
/// Equality and hashing use `id` only. The song is shared, so cloning an
/// item (which every projection does) never copies song metadata.
#[derive(Debug, Clone)]
pub struct QueueItem {
    id: QueueItemId,
    song: Arc<Song>,
    is_current: bool,
}

impl QueueItem {
    /// Wrap a song in a fresh, non-current item
    pub fn new(song: Song) -> Self {
        Self {
            id: QueueItemId::generate(),
            song: Arc::new(song),
            is_current: false,
        }
    }

    pub fn id(&self) -> QueueItemId {
        self.id
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Whether this item is the one now playing
    pub fn is_current(&self) -> bool {
        self.is_current
    }

    /// Same item (same id) with a different current flag
    #[must_use]
    pub fn clone_with_current(&self, is_current: bool) -> Self {
        Self {
            id: self.id,
            song: Arc::clone(&self.song),
            is_current,
        }
    }
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QueueItem {}

impl Hash for QueueItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
