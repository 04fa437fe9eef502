//! Song domain type

use crate::types::SongId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A song as supplied by the library
///
/// Immutable once handed to the playback engine. The engine only ever reads
/// `id`; the remaining fields are carried along for observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Durable identifier
    pub id: SongId,

    /// Song title
    pub name: String,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Track number
    pub track: Option<u32>,

    /// Duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Location of the media, when local
    pub path: Option<PathBuf>,
}

impl Song {
    /// Create a song with minimal metadata
    pub fn new(id: SongId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            artist: None,
            album: None,
            track: None,
            duration_ms: None,
            path: None,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the album
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the media path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}
