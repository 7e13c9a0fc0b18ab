use tracing::debug;

use crate::audio::AudioSink;
use crate::config;
use crate::player::PlaybackController;

/// Apply configured playback defaults to a freshly built controller.
pub fn apply_playback_defaults<S: AudioSink>(
    controller: &mut PlaybackController<S>,
    settings: &config::Settings,
) {
    controller.set_volume(i32::from(settings.audio.initial_volume));
    if settings.playback.shuffle != controller.state().is_shuffled {
        controller.toggle_shuffle();
    }
    if settings.playback.repeat != controller.state().is_repeated {
        controller.toggle_repeat();
    }
    debug!(state = ?controller.state(), "playback defaults applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mock::MockSink;
    use crate::library::{Playlist, Track};

    fn controller() -> PlaybackController<MockSink> {
        let track = Track {
            file: "a.mp3".into(),
            title: "a".into(),
            artist: "Unknown".into(),
            cover: None,
            duration_secs: 10,
        };
        PlaybackController::new(Playlist::new(vec![track]).unwrap(), MockSink::new())
    }

    #[test]
    fn defaults_leave_startup_state_alone() {
        let mut c = controller();
        apply_playback_defaults(&mut c, &config::Settings::default());
        assert_eq!(c.state().volume_percent, 70);
        assert!(!c.state().is_shuffled);
        assert!(!c.state().is_repeated);
        assert!(!c.state().is_playing);
    }

    #[test]
    fn configured_values_are_applied() {
        let mut settings = config::Settings::default();
        settings.audio.initial_volume = 30;
        settings.playback.shuffle = true;
        settings.playback.repeat = true;

        let mut c = controller();
        apply_playback_defaults(&mut c, &settings);
        assert_eq!(c.state().volume_percent, 30);
        assert!(c.state().is_shuffled);
        assert!(c.state().is_repeated);
        assert!(c.sink().calls.is_empty());
    }
}
