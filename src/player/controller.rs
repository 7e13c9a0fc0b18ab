//! Playback state machine.
//!
//! The controller owns the playlist, the playback state and the only audio
//! sink. Every mutation goes through one of its methods (or [`Command`]s via
//! `dispatch`) and ends with a snapshot pushed to each subscribed observer.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::audio::{AudioSink, SinkEvent};
use crate::error::{AudioError, PlayerError};
use crate::library::{Playlist, Track};

use super::command::Command;
use super::observer::{Snapshot, UiObserver};
use super::state::{PlaybackState, Transport};

pub struct PlaybackController<S: AudioSink> {
    playlist: Playlist,
    state: PlaybackState,
    transport: Transport,
    sink: S,
    observers: Vec<Box<dyn UiObserver>>,
    rng: StdRng,
    /// Bumped whenever the sink's load is discarded; events polled under an
    /// older value belong to a previous track.
    load_generation: u64,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(playlist: Playlist, sink: S) -> Self {
        Self::with_rng(playlist, sink, StdRng::from_entropy())
    }

    /// Build a controller with a fixed shuffle RNG.
    pub fn with_rng(playlist: Playlist, sink: S, rng: StdRng) -> Self {
        Self {
            playlist,
            state: PlaybackState::default(),
            transport: Transport::Stopped,
            sink,
            observers: Vec::new(),
            rng,
            load_generation: 0,
        }
    }

    /// Register an observer and send it the current snapshot right away.
    pub fn subscribe(&mut self, mut observer: Box<dyn UiObserver>) {
        observer.on_state_changed(&self.snapshot());
        self.observers.push(observer);
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_track(&self) -> &Track {
        &self.playlist[self.state.current_index]
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(None)
    }

    fn snapshot_with(&self, error: Option<AudioError>) -> Snapshot {
        let track = self.current_track().clone();
        Snapshot {
            duration_secs: track.duration_secs,
            track,
            state: self.state,
            transport: self.transport,
            error,
        }
    }

    fn notify(&mut self, error: Option<AudioError>) {
        let snapshot = self.snapshot_with(error);
        for observer in self.observers.iter_mut() {
            observer.on_state_changed(&snapshot);
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<(), PlayerError> {
        debug!(?command, "dispatch");
        match command {
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Previous => self.previous_track(),
            Command::Next => self.next_track(),
            Command::Seek(secs) => self.seek(secs),
            Command::SeekBy(delta) => self.seek_by(delta),
            Command::SetVolume(percent) => self.set_volume(percent),
            Command::ToggleShuffle => self.toggle_shuffle(),
            Command::ToggleRepeat => self.toggle_repeat(),
            Command::SelectTrack(index) => return self.select_track(index),
        }
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start or resume the current track.
    ///
    /// Failures roll the playing intent back and are reported to observers;
    /// they never abort the session.
    pub fn play(&mut self) {
        self.state.is_playing = true;
        match self.start_output() {
            Ok(()) => {
                self.transport = Transport::Playing;
                self.notify(None);
            }
            Err(err) => self.fail(err),
        }
    }

    fn start_output(&mut self) -> Result<(), AudioError> {
        let file = &self.playlist[self.state.current_index].file;
        if self.transport == Transport::Stopped || self.sink.loaded() != Some(file.as_str()) {
            self.sink.load(file)?;
            self.transport = Transport::Loaded;
            if self.state.position_secs > 0 {
                let at = Duration::from_secs(self.state.position_secs);
                if let Err(err) = self.sink.set_position(at) {
                    // Drop the load so a retry reloads and seeks again.
                    self.sink.stop();
                    return Err(err);
                }
            }
        }
        self.sink.set_volume(self.state.volume_percent);
        self.sink.play()
    }

    /// Revert to paused after a load or output failure. The position is kept.
    fn fail(&mut self, err: AudioError) {
        warn!(error = %err, index = self.state.current_index, "playback failed");
        self.state.is_playing = false;
        self.transport = if self.sink.loaded().is_none() {
            Transport::Stopped
        } else {
            self.sink.pause();
            Transport::Paused
        };
        self.notify(Some(err));
    }

    pub fn pause(&mut self) {
        if self.transport != Transport::Stopped {
            self.sink.pause();
            self.state.position_secs = self.clamp_position(self.sink.position().as_secs());
            self.transport = Transport::Paused;
        }
        self.state.is_playing = false;
        self.notify(None);
    }

    /// Step back one entry, wrapping. Shuffle does not apply here.
    pub fn previous_track(&mut self) {
        let n = self.playlist.len();
        self.state.current_index = (self.state.current_index + n - 1) % n;
        self.change_track();
    }

    /// Advance one entry, or pick a random one when shuffled (the current
    /// track may be picked again).
    pub fn next_track(&mut self) {
        let n = self.playlist.len();
        self.state.current_index = if self.state.is_shuffled {
            self.rng.gen_range(0..n)
        } else {
            (self.state.current_index + 1) % n
        };
        self.change_track();
    }

    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.playlist.len() {
            return Err(PlayerError::IndexOutOfBounds(index));
        }
        self.state.current_index = index;
        self.change_track();
        Ok(())
    }

    /// Switch the sink to the track at `current_index`, keeping the playing intent.
    pub fn change_track(&mut self) {
        self.discard_load();
        self.state.position_secs = 0;
        debug!(
            index = self.state.current_index,
            title = %self.current_track().title,
            "track changed"
        );
        if self.state.is_playing {
            self.play();
        } else {
            self.notify(None);
        }
    }

    pub fn handle_track_end(&mut self) {
        if self.state.is_repeated {
            debug!(index = self.state.current_index, "repeating track");
            self.discard_load();
            self.state.position_secs = 0;
            self.play();
        } else {
            self.next_track();
        }
    }

    fn discard_load(&mut self) {
        self.sink.stop();
        self.transport = Transport::Stopped;
        self.load_generation += 1;
    }

    pub fn seek(&mut self, secs: u64) {
        let position = self.clamp_position(secs);
        self.state.position_secs = position;
        if self.transport != Transport::Stopped {
            if let Err(err) = self.sink.set_position(Duration::from_secs(position)) {
                self.fail(err);
                return;
            }
        }
        self.notify(None);
    }

    pub fn seek_by(&mut self, delta: i64) {
        let current = if self.transport == Transport::Playing {
            self.sink.position().as_secs()
        } else {
            self.state.position_secs
        };
        let target = (current as i64).saturating_add(delta).max(0) as u64;
        self.seek(target);
    }

    pub fn set_volume(&mut self, percent: i32) {
        let volume = percent.clamp(0, 100) as u8;
        self.state.volume_percent = volume;
        if self.transport != Transport::Stopped {
            self.sink.set_volume(volume);
        }
        self.notify(None);
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffled = !self.state.is_shuffled;
        self.notify(None);
    }

    pub fn toggle_repeat(&mut self) {
        self.state.is_repeated = !self.state.is_repeated;
        self.notify(None);
    }

    /// Apply every event the sink accumulated since the last poll.
    pub fn poll_sink(&mut self) {
        let generation = self.load_generation;
        for event in self.sink.poll_events() {
            if self.load_generation != generation {
                debug!(?event, "dropping event from a previous load");
                break;
            }
            self.on_sink_event(event);
        }
    }

    pub fn on_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::PositionChanged(position) => {
                if self.transport != Transport::Playing {
                    return;
                }
                self.state.position_secs = self.clamp_position(position.as_secs());
                match self.sink.duration() {
                    Some(total) if position >= total => self.handle_track_end(),
                    _ => self.notify(None),
                }
            }
            SinkEvent::Ended => {
                if self.transport == Transport::Playing {
                    self.handle_track_end();
                } else {
                    debug!(transport = ?self.transport, "ignoring end of track");
                }
            }
            SinkEvent::Error(err) => self.fail(err),
        }
    }

    /// Release the sink at the end of the session.
    pub fn shutdown(&mut self, fade_out: Duration) {
        info!(?fade_out, "releasing audio output");
        self.sink.release(fade_out);
        self.transport = Transport::Stopped;
        self.state.is_playing = false;
        self.notify(None);
    }

    /// Length used to bound positions: the stored duration, else what the
    /// sink reports, else 0 (unknown).
    fn duration_secs(&self) -> u64 {
        match self.current_track().duration_secs {
            0 => self.sink.duration().map_or(0, |d| d.as_secs()),
            stored => stored,
        }
    }

    fn clamp_position(&self, secs: u64) -> u64 {
        match self.duration_secs() {
            0 => secs,
            total => secs.min(total),
        }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
