//! Property checks for navigation and state toggles.

use proptest::prelude::*;

use super::Command;
use super::tests::controller_with;

fn durations() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..600, 1..30)
}

/// A playlist plus a valid index into it.
fn playlist_and_index() -> impl Strategy<Value = (Vec<u64>, usize)> {
    durations().prop_flat_map(|d| {
        let n = d.len();
        (Just(d), 0..n)
    })
}

proptest! {
    #[test]
    fn next_and_previous_wrap_modulo_len((d, start) in playlist_and_index(), playing in any::<bool>()) {
        let n = d.len();
        let mut c = controller_with(&d);
        c.select_track(start).unwrap();
        if playing {
            c.play();
        }

        c.next_track();
        prop_assert_eq!(c.state().current_index, (start + 1) % n);
        c.previous_track();
        prop_assert_eq!(c.state().current_index, start);
        c.previous_track();
        prop_assert_eq!(c.state().current_index, (start + n - 1) % n);
        prop_assert_eq!(c.state().is_playing, playing);
    }

    #[test]
    fn n_nexts_visit_every_track_once(d in durations()) {
        let n = d.len();
        let mut c = controller_with(&d);
        let mut visited = vec![false; n];
        for _ in 0..n {
            c.next_track();
            let i = c.state().current_index;
            prop_assert!(!visited[i]);
            visited[i] = true;
        }
        prop_assert_eq!(c.state().current_index, 0);
        prop_assert!(visited.iter().all(|v| *v));
    }

    #[test]
    fn shuffled_next_stays_in_range(d in durations(), steps in 1usize..50) {
        let n = d.len();
        let mut c = controller_with(&d);
        c.toggle_shuffle();
        for _ in 0..steps {
            c.next_track();
            prop_assert!(c.state().current_index < n);
            prop_assert_eq!(c.state().position_secs, 0);
        }
    }

    #[test]
    fn toggles_are_their_own_inverse(d in durations()) {
        let mut c = controller_with(&d);
        let before = *c.state();
        c.toggle_shuffle();
        c.toggle_shuffle();
        c.toggle_repeat();
        c.toggle_repeat();
        prop_assert_eq!(*c.state(), before);
    }

    #[test]
    fn volume_is_clamped_and_survives_track_changes(d in durations(), percent in any::<i32>()) {
        let mut c = controller_with(&d);
        c.set_volume(percent);
        let expected = percent.clamp(0, 100) as u8;
        prop_assert_eq!(c.state().volume_percent, expected);

        c.play();
        c.next_track();
        prop_assert_eq!(c.state().volume_percent, expected);
        prop_assert_eq!(c.sink().volume, expected);
    }

    #[test]
    fn seek_never_exceeds_known_duration(duration in 1u64..600, target in any::<u64>()) {
        let mut c = controller_with(&[duration]);
        c.seek(target);
        prop_assert_eq!(c.state().position_secs, target.min(duration));
    }

    #[test]
    fn track_end_with_repeat_restarts_same_track((d, start) in playlist_and_index(), pos in 0u64..600) {
        let mut c = controller_with(&d);
        c.dispatch(Command::SelectTrack(start)).unwrap();
        c.seek(pos);
        c.toggle_repeat();
        c.handle_track_end();
        prop_assert_eq!(c.state().current_index, start);
        prop_assert_eq!(c.state().position_secs, 0);
        prop_assert!(c.state().is_playing);
    }
}
