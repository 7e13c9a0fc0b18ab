/// Volume the player starts with before settings are applied.
pub const DEFAULT_VOLUME: u8 = 70;

/// Observable playback state, owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    /// Playing intent; rolled back when the sink fails to start.
    pub is_playing: bool,
    pub is_shuffled: bool,
    pub is_repeated: bool,
    pub position_secs: u64,
    pub volume_percent: u8,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            is_shuffled: false,
            is_repeated: false,
            position_secs: 0,
            volume_percent: DEFAULT_VOLUME,
        }
    }
}

/// Lifecycle of the file held by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Nothing loaded.
    #[default]
    Stopped,
    /// Current track loaded but never started.
    Loaded,
    Playing,
    Paused,
}
