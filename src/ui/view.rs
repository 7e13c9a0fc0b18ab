use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::ThreadRng;

use crate::player::{Snapshot, Transport, UiObserver};

use super::visualizer::Visualizer;

/// Frames of the spinning record.
pub const VINYL_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Everything the terminal renders, fed by controller snapshots plus
/// local UI state (cursor, animation).
#[derive(Debug)]
pub struct ViewState {
    pub snapshot: Option<Snapshot>,
    /// Last failure, kept until playback starts successfully.
    pub last_error: Option<String>,
    /// Playlist row under the cursor.
    pub cursor: usize,
    pub vinyl_frame: usize,
    pub visualizer: Visualizer,
    playlist_len: usize,
    rng: ThreadRng,
}

pub type ViewHandle = Rc<RefCell<ViewState>>;

impl ViewState {
    pub fn new(playlist_len: usize, bars: usize) -> Self {
        Self {
            snapshot: None,
            last_error: None,
            cursor: 0,
            vinyl_frame: 0,
            visualizer: Visualizer::new(bars),
            playlist_len,
            rng: rand::thread_rng(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.state.is_playing)
    }

    pub fn apply(&mut self, snapshot: &Snapshot) {
        let index_changed = self
            .snapshot
            .as_ref()
            .is_none_or(|prev| prev.state.current_index != snapshot.state.current_index);
        if index_changed {
            self.cursor = snapshot.state.current_index;
        }

        match &snapshot.error {
            Some(err) => self.last_error = Some(err.to_string()),
            None if snapshot.transport == Transport::Playing => self.last_error = None,
            None => {}
        }

        let was_playing = self.is_playing();
        self.snapshot = Some(snapshot.clone());
        if was_playing != snapshot.state.is_playing {
            self.visualizer
                .tick(snapshot.state.is_playing, &mut self.rng);
        }
    }

    /// Advance the animation one frame.
    pub fn tick(&mut self) {
        let playing = self.is_playing();
        if playing {
            self.vinyl_frame = (self.vinyl_frame + 1) % VINYL_FRAMES.len();
        }
        self.visualizer.tick(playing, &mut self.rng);
    }

    pub fn vinyl(&self) -> &'static str {
        VINYL_FRAMES[self.vinyl_frame]
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.playlist_len {
            self.cursor += 1;
        }
    }
}

/// Controller observer writing into a shared [`ViewState`].
pub struct ViewObserver(pub ViewHandle);

impl UiObserver for ViewObserver {
    fn on_state_changed(&mut self, snapshot: &Snapshot) {
        self.0.borrow_mut().apply(snapshot);
    }
}
