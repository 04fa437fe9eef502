//! Cadence - Playback Queue
//!
//! The ordered list of items a player works through, independent of any
//! audio output, UI or storage.
//!
//! This crate provides:
//! - Dual ordering (base + shuffle) over one set of queue items
//! - Current item tracking and next/previous navigation
//! - Shuffle (current item pinned first) and repeat modes (Off, All, One)
//! - Add, insert, remove, move and "play next" editing
//! - Change notifications to registered observers
//! - Snapshots for persisting and restoring the queue across launches
//!
//! # Example: Basic Queue
//!
//! ```rust
//! use cadence_core::{Song, SongId};
//! use cadence_queue::{QueueManager, RepeatMode};
//!
//! let songs: Vec<Song> = (1..=3)
//!     .map(|id| Song::new(SongId::new(id), format!("Track {}", id)))
//!     .collect();
//!
//! let mut queue = QueueManager::default();
//! assert!(queue.set_queue(songs, None, 0));
//!
//! assert!(queue.skip_to_next(false));
//! assert_eq!(queue.current_position(), Some(1));
//!
//! queue.set_repeat_mode(RepeatMode::All);
//! queue.skip_to(2);
//! assert_eq!(queue.get_next(false).unwrap().song().id, SongId::new(1));
//! ```
//!
//! # Example: Observing Changes
//!
//! ```rust
//! use cadence_queue::{QueueCallback, QueueManager, ShuffleMode};
//! use std::sync::Arc;
//!
//! struct ShuffleLogger;
//!
//! impl QueueCallback for ShuffleLogger {
//!     fn on_shuffle_changed(&self, mode: ShuffleMode) {
//!         println!("shuffle is now {:?}", mode);
//!     }
//! }
//!
//! let mut queue = QueueManager::default();
//! queue.add_callback(Arc::new(ShuffleLogger));
//! queue.toggle_shuffle_mode();
//! ```
//!
//! # Example: Persisting the Queue
//!
//! ```rust,no_run
//! use cadence_queue::{JsonFileSnapshotStore, QueueManager, SnapshotPersister};
//! use std::sync::Arc;
//!
//! let persister = Arc::new(SnapshotPersister::new(JsonFileSnapshotStore::new(
//!     "/var/lib/cadence/queue.json",
//! )));
//!
//! let mut queue = QueueManager::default();
//! queue.add_callback(persister);
//!
//! // On the next launch:
//! // restore_queue(&mut queue, &library, &JsonFileSnapshotStore::new(...)).await?;
//! ```

mod error;
mod item;
mod manager;
mod restore;
mod shared;
mod shuffle;
mod snapshot;
mod store;
pub mod types;
mod view;
mod watcher;

// Public exports
pub use error::{QueueError, Result};
pub use item::{QueueItem, QueueItemId};
pub use manager::QueueManager;
pub use restore::{restore_queue, RestorePlan};
pub use shared::SharedQueueManager;
pub use shuffle::{ComputedShuffle, ShuffleJob};
pub use snapshot::{
    JsonFileSnapshotStore, MemorySnapshotStore, QueueSnapshot, SnapshotPersister, SnapshotStore,
};
pub use store::{Ordering, QueueStore};
pub use types::{QueueChangeReason, QueueConfig, RepeatMode, ShuffleMode};
pub use view::QueueView;
pub use watcher::{QueueCallback, QueueWatcher};
