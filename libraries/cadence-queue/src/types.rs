//! Core types for queue management

use serde::{Deserialize, Serialize};

/// Shuffle mode
///
/// Selects which of the two orderings is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShuffleMode {
    /// Play the base (sequential) order
    #[default]
    Off,

    /// Play the shuffle order
    On,
}

impl ShuffleMode {
    /// The other mode
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ShuffleMode::Off => ShuffleMode::On,
            ShuffleMode::On => ShuffleMode::Off,
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current item only
    One,
}

impl RepeatMode {
    /// Next mode in the Off -> All -> One -> Off cycle
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Why the queue changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueChangeReason {
    /// Items were replaced, added, removed or reshuffled
    #[default]
    Default,

    /// Items were reordered in place
    Move,

    /// The queue was restored from a snapshot
    Restore,
}

/// Configuration for the queue manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Initial shuffle mode (default: Off)
    pub shuffle_mode: ShuffleMode,

    /// Initial repeat mode (default: Off)
    pub repeat_mode: RepeatMode,

    /// Keep shuffle on when a new queue is set without an explicit shuffle
    /// order (default: false)
    pub retain_shuffle_on_new_queue: bool,
}
