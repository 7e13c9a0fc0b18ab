//! Audio sink contract shared by the controller and sink implementations.

use std::time::Duration;

use crate::error::AudioError;

/// Notifications a sink reports back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// Playback position of the loaded file moved.
    PositionChanged(Duration),
    /// The loaded file played to its end.
    Ended,
    /// Output failed after a successful start.
    Error(AudioError),
}

/// Playback primitive for a single file at a time.
///
/// Loading or stopping discards any event still pending for the previous
/// load, so a new file never sees the old one's `Ended`.
pub trait AudioSink {
    /// Open and decode `file`, replacing whatever was loaded. Leaves the sink paused.
    fn load(&mut self, file: &str) -> Result<(), AudioError>;
    /// File reference of the current load, if any.
    fn loaded(&self) -> Option<&str>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Stop output and drop the current load.
    fn stop(&mut self);
    fn position(&self) -> Duration;
    fn set_position(&mut self, position: Duration) -> Result<(), AudioError>;
    /// Total length of the loaded file when the decoder knows it.
    fn duration(&self) -> Option<Duration>;
    /// Volume in percent (0-100).
    fn set_volume(&mut self, percent: u8);
    /// Drain notifications accumulated since the last call.
    fn poll_events(&mut self) -> Vec<SinkEvent>;

    /// Release the output at shutdown.
    fn release(&mut self, fade_out: Duration) {
        let _ = fade_out;
        self.stop();
    }
}
