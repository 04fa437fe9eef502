//! Cadence Core
//!
//! Platform-agnostic domain values and provider traits shared by the
//! Cadence playback libraries.
//!
//! The core crate defines:
//! - **Domain Types**: `Song` and its durable `SongId`
//! - **Provider Traits**: `SongRepository`, the read-only source of songs
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Song, SongId};
//!
//! let song = Song::new(SongId::new(42), "Blue in Green")
//!     .with_artist("Miles Davis")
//!     .with_album("Kind of Blue");
//!
//! assert_eq!(song.id, SongId::new(42));
//! assert_eq!(song.artist.as_deref(), Some("Miles Davis"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::SongRepository;
pub use types::{Song, SongId};
