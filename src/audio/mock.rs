//! In-memory sink used by controller tests.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::AudioError;

use super::types::{AudioSink, SinkEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Load(String),
    Play,
    Pause,
    Stop,
    SetPosition(Duration),
    SetVolume(u8),
    Release,
}

#[derive(Debug, Default)]
pub struct MockSink {
    pub file: Option<String>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: u8,
    pub calls: Vec<SinkCall>,
    /// Files whose load fails.
    pub broken_files: HashSet<String>,
    pub fail_play: bool,
    pub fail_seek: bool,
    pending: Vec<SinkEvent>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: SinkEvent) {
        self.pending.push(event);
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::Load(_)))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl AudioSink for MockSink {
    fn load(&mut self, file: &str) -> Result<(), AudioError> {
        self.calls.push(SinkCall::Load(file.to_string()));
        self.pending.clear();
        self.playing = false;
        self.position = Duration::ZERO;
        if self.broken_files.contains(file) {
            self.file = None;
            return Err(AudioError::load(file, "unsupported format"));
        }
        self.file = Some(file.to_string());
        Ok(())
    }

    fn loaded(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.calls.push(SinkCall::Play);
        if self.file.is_none() {
            return Err(AudioError::playback("nothing loaded"));
        }
        if self.fail_play {
            return Err(AudioError::playback("device busy"));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(SinkCall::Pause);
        self.playing = false;
    }

    fn stop(&mut self) {
        self.calls.push(SinkCall::Stop);
        self.pending.clear();
        self.file = None;
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn set_position(&mut self, position: Duration) -> Result<(), AudioError> {
        self.calls.push(SinkCall::SetPosition(position));
        if self.fail_seek {
            return Err(AudioError::playback("seek failed"));
        }
        self.position = position;
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.file.as_ref().and(self.duration)
    }

    fn set_volume(&mut self, percent: u8) {
        self.calls.push(SinkCall::SetVolume(percent));
        self.volume = percent;
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.pending)
    }

    fn release(&mut self, _fade_out: Duration) {
        self.calls.push(SinkCall::Release);
        self.stop();
    }
}
