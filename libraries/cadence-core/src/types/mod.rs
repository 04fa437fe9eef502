//! Domain types shared across Cadence

mod ids;
mod song;

pub use ids::SongId;
pub use song::Song;
