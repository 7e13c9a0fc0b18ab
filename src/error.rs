//! Error types for the player core and the audio sink.

use thiserror::Error;

/// Failures reported by an audio sink.
///
/// Both kinds are non-fatal: the controller falls back to paused and keeps
/// the session usable for other tracks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The file could not be opened or decoded.
    #[error("failed to load {file}: {reason}")]
    Load { file: String, reason: String },

    /// The output could not be started.
    #[error("playback failed: {0}")]
    Playback(String),
}

impl AudioError {
    pub fn load(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    pub fn playback(reason: impl ToString) -> Self {
        Self::Playback(reason.to_string())
    }
}

/// Errors returned by playlist construction and controller commands.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("track index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}
