//! MPRIS (D-Bus) remote control.
//!
//! The service runs on its own thread and never touches the controller: method
//! calls and property writes become [`ControlCmd`]s sent to the event loop, and
//! property reads come from the last snapshot published by [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::player::{Command, PlaybackState, Snapshot, Transport, UiObserver};

const BUS_NAME: &str = "org.mpris.MediaPlayer2.turntable";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const MICROS: i64 = 1_000_000;

#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek in microseconds.
    SeekBy(i64),
    /// Absolute position in microseconds.
    SetPosition(i64),
    SetShuffle(bool),
    SetRepeat(bool),
    /// MPRIS volume, 0.0 to 1.0.
    SetVolume(f64),
}

impl ControlCmd {
    /// Translate into a controller command given the current state.
    /// `Quit` and requests that change nothing map to `None`.
    pub fn into_command(self, state: &PlaybackState) -> Option<Command> {
        match self {
            ControlCmd::Quit => None,
            ControlCmd::Play => Some(Command::Play),
            ControlCmd::Pause | ControlCmd::Stop => Some(Command::Pause),
            ControlCmd::PlayPause => Some(Command::TogglePlayPause),
            ControlCmd::Next => Some(Command::Next),
            ControlCmd::Prev => Some(Command::Previous),
            ControlCmd::SeekBy(micros) => match nearest_secs(micros) {
                0 => None,
                secs => Some(Command::SeekBy(secs)),
            },
            ControlCmd::SetPosition(micros) => {
                Some(Command::Seek(nearest_secs(micros.max(0)) as u64))
            }
            ControlCmd::SetShuffle(on) => (on != state.is_shuffled).then_some(Command::ToggleShuffle),
            ControlCmd::SetRepeat(on) => (on != state.is_repeated).then_some(Command::ToggleRepeat),
            ControlCmd::SetVolume(level) if level.is_finite() => {
                Some(Command::SetVolume((level * 100.0).round() as i32))
            }
            ControlCmd::SetVolume(_) => None,
        }
    }
}

/// Microseconds to whole seconds, rounding half away from zero.
fn nearest_secs(micros: i64) -> i64 {
    (micros as f64 / MICROS as f64).round() as i64
}

type SharedState = Arc<Mutex<Option<Snapshot>>>;

/// Observer that publishes snapshots to the D-Bus thread.
pub struct MprisHandle {
    state: SharedState,
}

impl UiObserver for MprisHandle {
    fn on_state_changed(&mut self, snapshot: &Snapshot) {
        if let Ok(mut s) = self.state.lock() {
            *s = Some(snapshot.clone());
        }
    }
}

pub fn playback_status(snapshot: Option<&Snapshot>) -> &'static str {
    match snapshot {
        Some(s) if s.state.is_playing => "Playing",
        Some(s) if s.transport != Transport::Stopped || s.state.position_secs > 0 => "Paused",
        _ => "Stopped",
    }
}

pub fn loop_status(repeat: bool) -> &'static str {
    if repeat { "Track" } else { "Playlist" }
}

fn track_id(index: usize) -> Option<OwnedObjectPath> {
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{index}"))
        .ok()
        .map(OwnedObjectPath::from)
}

fn insert<'a>(map: &mut HashMap<String, OwnedValue>, key: &str, value: impl Into<Value<'a>>) {
    if let Ok(v) = OwnedValue::try_from(value.into()) {
        map.insert(key.to_string(), v);
    }
}

/// MPRIS metadata for the active track. `mpris:length` is left out when the
/// duration is unknown.
pub fn metadata_map(track: &Track, index: usize, duration_secs: u64) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();
    if let Some(id) = track_id(index) {
        insert(&mut map, "mpris:trackid", id.into_inner());
    }
    if duration_secs > 0 {
        insert(&mut map, "mpris:length", duration_secs as i64 * MICROS);
    }
    insert(&mut map, "xesam:title", track.title.clone());
    insert(&mut map, "xesam:artist", vec![track.artist.clone()]);
    map
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "turntable"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: SharedState,
}

impl PlayerIface {
    fn send(&self, cmd: ControlCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("MPRIS command dropped: player is gone");
        }
    }

    fn read<T>(&self, f: impl FnOnce(Option<&Snapshot>) -> T) -> T {
        match self.state.lock() {
            Ok(s) => f(s.as_ref()),
            Err(_) => f(None),
        }
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(ControlCmd::Next);
    }

    fn previous(&self) {
        self.send(ControlCmd::Prev);
    }

    fn play(&self) {
        self.send(ControlCmd::Play);
    }

    fn pause(&self) {
        self.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        self.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        self.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        self.send(ControlCmd::SeekBy(offset));
    }

    fn set_position(&self, track_id: OwnedObjectPath, position: i64) {
        let current = self.read(|s| s.and_then(|s| self::track_id(s.state.current_index)));
        if current.as_ref() == Some(&track_id) {
            self.send(ControlCmd::SetPosition(position));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.read(playback_status)
    }

    #[zbus(property)]
    fn loop_status(&self) -> &str {
        self.read(|s| loop_status(s.is_some_and(|s| s.state.is_repeated)))
    }

    #[zbus(property)]
    fn set_loop_status(&mut self, value: String) {
        self.send(ControlCmd::SetRepeat(value == "Track"));
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        self.read(|s| s.is_some_and(|s| s.state.is_shuffled))
    }

    #[zbus(property)]
    fn set_shuffle(&mut self, value: bool) {
        self.send(ControlCmd::SetShuffle(value));
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.read(|s| s.map_or(0.0, |s| f64::from(s.state.volume_percent) / 100.0))
    }

    #[zbus(property)]
    fn set_volume(&mut self, value: f64) {
        self.send(ControlCmd::SetVolume(value));
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.read(|s| s.map_or(0, |s| s.state.position_secs as i64 * MICROS))
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.read(|s| match s {
            Some(s) => metadata_map(&s.track, s.state.current_index, s.duration_secs),
            None => HashMap::new(),
        })
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }
}

/// Start the D-Bus service. Failing to reach the session bus only disables
/// remote control.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state: SharedState = Arc::new(Mutex::new(None));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root interface");
                return;
            }

            let player = PlayerIface {
                tx,
                state: state_for_thread,
            };
            if let Err(e) = object_server.at(OBJECT_PATH, player).await {
                warn!(error = %e, "MPRIS: failed to register player interface");
                return;
            }

            info!(name = BUS_NAME, "MPRIS service registered");
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
