use std::ops::Index;

use crate::error::PlayerError;

/// Glyph shown when a track carries no cover of its own.
pub const DEFAULT_COVER: &str = "🎵";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Opaque file reference handed to the audio sink.
    pub file: String,
    pub title: String,
    pub artist: String,
    pub cover: Option<String>,
    /// Whole seconds; 0 when the duration could not be read.
    pub duration_secs: u64,
}

impl Track {
    pub fn cover_glyph(&self) -> &str {
        self.cover.as_deref().unwrap_or(DEFAULT_COVER)
    }
}

/// Ordered, non-empty list of tracks, fixed for the session.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlayerError> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl Index<usize> for Playlist {
    type Output = Track;

    fn index(&self, index: usize) -> &Track {
        &self.tracks[index]
    }
}
