use crate::error::AudioError;
use crate::library::Track;

use super::state::{PlaybackState, Transport};

/// Everything an observer needs to render the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The active playlist entry.
    pub track: Track,
    pub state: PlaybackState,
    pub transport: Transport,
    /// Stored duration of the active track (0 = unknown).
    pub duration_secs: u64,
    /// Set only on the notification that reports a failure.
    pub error: Option<AudioError>,
}

/// Receives a snapshot after every controller mutation.
pub trait UiObserver {
    fn on_state_changed(&mut self, snapshot: &Snapshot);
}
