//! Error types for the queue boundary (snapshots and restore)
//!
//! Queue operations themselves never fail; see `QueueManager`.

use cadence_core::CoreError;
use thiserror::Error;

/// Queue persistence and restore errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// Song lookup failed
    #[error("Song lookup failed: {0}")]
    Core(#[from] CoreError),

    /// Snapshot store error
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("Snapshot encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue persistence and restore
pub type Result<T> = std::result::Result<T, QueueError>;
