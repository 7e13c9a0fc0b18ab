/// User-facing controls, as issued by the key map or the MPRIS bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlayPause,
    Play,
    Pause,
    Previous,
    Next,
    /// Jump to an absolute position in seconds.
    Seek(u64),
    /// Move the position by the given number of seconds (positive or negative).
    SeekBy(i64),
    /// Set the volume; values outside 0-100 are clamped.
    SetVolume(i32),
    ToggleShuffle,
    ToggleRepeat,
    /// Jump to a playlist entry.
    SelectTrack(usize),
}
