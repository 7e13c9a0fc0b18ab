use super::*;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        file: "audio/test.mp3".to_string(),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        cover: None,
        duration_secs: 200,
    }
}

fn snapshot(is_playing: bool, transport: Transport) -> Snapshot {
    Snapshot {
        track: make_track(),
        state: PlaybackState {
            current_index: 3,
            is_playing,
            is_shuffled: true,
            is_repeated: false,
            position_secs: 42,
            volume_percent: 60,
        },
        transport,
        duration_secs: 200,
        error: None,
    }
}

fn iface() -> (PlayerIface, SharedState, mpsc::Receiver<ControlCmd>) {
    let state: SharedState = Arc::new(Mutex::new(None));
    let (tx, rx) = mpsc::channel();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn handle_publishes_latest_snapshot() {
    let state: SharedState = Arc::new(Mutex::new(None));
    let mut handle = MprisHandle {
        state: state.clone(),
    };

    handle.on_state_changed(&snapshot(true, Transport::Playing));
    assert_eq!(
        state.lock().unwrap().as_ref().map(|s| s.state.current_index),
        Some(3)
    );
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    assert_eq!(playback_status(None), "Stopped");
    assert_eq!(
        playback_status(Some(&snapshot(true, Transport::Playing))),
        "Playing"
    );
    assert_eq!(
        playback_status(Some(&snapshot(false, Transport::Paused))),
        "Paused"
    );

    let mut fresh = snapshot(false, Transport::Stopped);
    fresh.state.position_secs = 0;
    assert_eq!(playback_status(Some(&fresh)), "Stopped");
}

#[test]
fn loop_status_reflects_repeat() {
    assert_eq!(loop_status(true), "Track");
    assert_eq!(loop_status(false), "Playlist");
}

#[test]
fn metadata_includes_expected_keys() {
    let map = metadata_map(&make_track(), 3, 200);
    for k in ["mpris:trackid", "mpris:length", "xesam:title", "xesam:artist"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
    assert_eq!(*map["mpris:length"], Value::from(200 * 1_000_000_i64));
}

#[test]
fn metadata_skips_unknown_length() {
    let map = metadata_map(&make_track(), 0, 0);
    assert!(!map.contains_key("mpris:length"));
    assert!(map.contains_key("xesam:title"));
}

#[test]
fn properties_read_shared_snapshot() {
    let (iface, state, _rx) = iface();
    assert_eq!(iface.playback_status(), "Stopped");
    assert!(iface.metadata().is_empty());

    *state.lock().unwrap() = Some(snapshot(true, Transport::Playing));
    assert_eq!(iface.playback_status(), "Playing");
    assert_eq!(iface.loop_status(), "Playlist");
    assert!(iface.shuffle());
    assert_eq!(iface.volume(), 0.6);
    assert_eq!(iface.position(), 42_000_000);
    assert_eq!(iface.metadata().len(), 4);
}

#[test]
fn methods_and_setters_forward_commands() {
    let (mut iface, _state, rx) = iface();
    iface.play_pause();
    iface.stop();
    iface.seek(-5_000_000);
    iface.set_shuffle(true);
    iface.set_loop_status("Track".to_string());
    iface.set_volume(0.25);

    let sent: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        sent,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::SeekBy(-5_000_000),
            ControlCmd::SetShuffle(true),
            ControlCmd::SetRepeat(true),
            ControlCmd::SetVolume(0.25),
        ]
    );
}

#[test]
fn set_position_ignores_stale_track_ids() {
    let (iface, state, rx) = iface();
    *state.lock().unwrap() = Some(snapshot(true, Transport::Playing));

    iface.set_position(track_id(1).unwrap(), 10_000_000);
    iface.set_position(track_id(3).unwrap(), 20_000_000);

    let sent: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(sent, vec![ControlCmd::SetPosition(20_000_000)]);
}

#[test]
fn control_commands_translate_to_player_commands() {
    let state = PlaybackState {
        is_shuffled: true,
        ..PlaybackState::default()
    };
    assert_eq!(ControlCmd::Quit.into_command(&state), None);
    assert_eq!(ControlCmd::Play.into_command(&state), Some(Command::Play));
    assert_eq!(ControlCmd::Stop.into_command(&state), Some(Command::Pause));
    assert_eq!(
        ControlCmd::PlayPause.into_command(&state),
        Some(Command::TogglePlayPause)
    );
    assert_eq!(ControlCmd::Prev.into_command(&state), Some(Command::Previous));
    assert_eq!(
        ControlCmd::SeekBy(-7_400_000).into_command(&state),
        Some(Command::SeekBy(-7))
    );
    assert_eq!(ControlCmd::SeekBy(400_000).into_command(&state), None);
    assert_eq!(
        ControlCmd::SetPosition(-3).into_command(&state),
        Some(Command::Seek(0))
    );
    assert_eq!(ControlCmd::SetShuffle(true).into_command(&state), None);
    assert_eq!(
        ControlCmd::SetShuffle(false).into_command(&state),
        Some(Command::ToggleShuffle)
    );
    assert_eq!(
        ControlCmd::SetRepeat(true).into_command(&state),
        Some(Command::ToggleRepeat)
    );
    assert_eq!(
        ControlCmd::SetVolume(0.333).into_command(&state),
        Some(Command::SetVolume(33))
    );
    assert_eq!(ControlCmd::SetVolume(f64::NAN).into_command(&state), None);
}

#[test]
fn seek_offsets_round_to_nearest_second() {
    let state = PlaybackState::default();
    assert_eq!(
        ControlCmd::SeekBy(-500_000).into_command(&state),
        Some(Command::SeekBy(-1))
    );
    assert_eq!(
        ControlCmd::SeekBy(1_500_000).into_command(&state),
        Some(Command::SeekBy(2))
    );
    assert_eq!(
        ControlCmd::SeekBy(2_600_000).into_command(&state),
        Some(Command::SeekBy(3))
    );
    assert_eq!(ControlCmd::SeekBy(-499_999).into_command(&state), None);
    assert_eq!(
        ControlCmd::SetPosition(59_700_000).into_command(&state),
        Some(Command::Seek(60))
    );
}
