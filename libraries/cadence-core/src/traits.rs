//! Provider traits for Cadence

use crate::error::Result;
use crate::types::{Song, SongId};
use async_trait::async_trait;

/// Read-only source of songs
///
/// Implemented by whatever owns the music library (local scanner, media
/// server client, ...). The playback engine never writes back to it.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Look up songs by id
    ///
    /// Ids that no longer resolve are omitted from the result. Order is
    /// unspecified; callers re-order by id themselves.
    ///
    /// # Errors
    /// Returns an error if the underlying library cannot be queried
    async fn songs_by_ids(&self, ids: &[SongId]) -> Result<Vec<Song>>;

    /// Look up a single song
    async fn song(&self, id: SongId) -> Result<Option<Song>> {
        Ok(self.songs_by_ids(&[id]).await?.into_iter().next())
    }
}
