//! `rodio` binding of [`AudioSink`].
//!
//! The output stream is opened on the first load and kept for the session.
//! Each load builds a fresh paused `Sink` on the stream's mixer, so only one
//! file is ever audible.

use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::error::AudioError;

use super::types::{AudioSink, SinkEvent};

/// Create a paused `Sink` for `file` that starts playback at `start_at`.
///
/// Returns the sink and the decoder's total duration, when known.
fn create_sink_at(
    stream: &OutputStream,
    file: &str,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let reader = File::open(file).map_err(|e| AudioError::load(file, e))?;
    let source = Decoder::new(BufReader::new(reader)).map_err(|e| AudioError::load(file, e))?;
    let total = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is a no-op.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out: Duration) {
    let fade_out_ms = fade_out.as_millis() as u64;
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub struct RodioSink {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    file: Option<String>,
    total: Option<Duration>,
    /// Added to `Sink::get_pos` after a skip-based seek rebuilt the sink.
    offset: Duration,
    volume: u8,
    last_reported_secs: Option<u64>,
    ended_reported: bool,
}

impl RodioSink {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            file: None,
            total: None,
            offset: Duration::ZERO,
            volume: 100,
            last_reported_secs: None,
            ended_reported: false,
        }
    }

    fn gain(&self) -> f32 {
        self.volume as f32 / 100.0
    }

    fn stream(&mut self) -> Result<&OutputStream, AudioError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::playback(format!("no audio output device: {e}")))?;
            // rodio logs to stderr when the stream is dropped, which would land on the TUI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| AudioError::playback("audio output unavailable"))
    }

    fn reset_reporting(&mut self) {
        self.last_reported_secs = None;
        self.ended_reported = false;
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for RodioSink {
    fn load(&mut self, file: &str) -> Result<(), AudioError> {
        self.stop();
        let gain = self.gain();
        let (sink, total) = create_sink_at(self.stream()?, file, Duration::ZERO)?;
        sink.set_volume(gain);

        debug!(file, ?total, "loaded");
        self.sink = Some(sink);
        self.file = Some(file.to_string());
        self.total = total;
        Ok(())
    }

    fn loaded(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let Some(sink) = self.sink.as_ref() else {
            return Err(AudioError::playback("nothing loaded"));
        };
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.file = None;
        self.total = None;
        self.offset = Duration::ZERO;
        self.reset_reporting();
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    fn set_position(&mut self, position: Duration) -> Result<(), AudioError> {
        let Some(file) = self.file.clone() else {
            return Ok(());
        };
        self.reset_reporting();
        let Some(sink) = self.sink.as_ref() else {
            return Ok(());
        };

        match sink.try_seek(position) {
            Ok(()) => {
                self.offset = Duration::ZERO;
                return Ok(());
            }
            Err(e) => debug!(file = %file, error = %e, "seek unsupported, rebuilding sink"),
        }

        // Scrubbing fallback: rebuild the sink and skip into the file.
        let paused = sink.is_paused();
        sink.stop();
        self.sink = None;

        let gain = self.gain();
        let (new_sink, total) = match create_sink_at(self.stream()?, &file, position) {
            Ok(built) => built,
            Err(e) => {
                self.file = None;
                self.total = None;
                return Err(e);
            }
        };
        new_sink.set_volume(gain);
        if !paused {
            new_sink.play();
        }
        self.sink = Some(new_sink);
        self.total = total;
        self.offset = position;
        Ok(())
    }

    fn duration(&self) -> Option<Duration> {
        self.total
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        let gain = self.gain();
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(gain);
        }
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        let mut events = Vec::new();
        let Some(sink) = self.sink.as_ref() else {
            return events;
        };
        if sink.is_paused() {
            return events;
        }

        let pos = self.offset + sink.get_pos();
        if self.last_reported_secs != Some(pos.as_secs()) {
            self.last_reported_secs = Some(pos.as_secs());
            events.push(SinkEvent::PositionChanged(pos));
        }
        if sink.empty() && !self.ended_reported {
            self.ended_reported = true;
            events.push(SinkEvent::Ended);
        }
        events
    }

    fn release(&mut self, fade_out: Duration) {
        if let Some(sink) = self.sink.as_ref() {
            if sink.is_paused() {
                sink.stop();
            } else {
                fade_out_sink(sink, self.gain(), fade_out);
            }
        }
        self.stop();
        if self.stream.take().is_some() {
            debug!("audio output released");
        }
    }
}
