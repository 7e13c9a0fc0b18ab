//! Keyboard bindings.
//!
//! Keys translate to [`Action`]s; player actions carry a ready-to-dispatch
//! [`Command`] so the event loop never computes volumes or offsets itself.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::ControlsSettings;
use crate::player::{Command, PlaybackState};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Player(Command),
    CursorUp,
    CursorDown,
    /// Play the playlist entry under the cursor.
    SelectCursor,
    Quit,
}

/// Footer help, in display order.
pub const HELP: &[(&str, &str)] = &[
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "scrub"),
    ("+/-", "volume"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("j/k", "cursor"),
    ("enter", "play selected"),
    ("q", "quit"),
];

pub fn action_for(
    key: KeyEvent,
    state: &PlaybackState,
    controls: &ControlsSettings,
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let scrub = controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let step = i32::from(controls.volume_step);
    let volume = i32::from(state.volume_percent);

    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::Player(Command::TogglePlayPause),
        KeyCode::Left | KeyCode::Char('h') => Action::Player(Command::Previous),
        KeyCode::Right | KeyCode::Char('l') => Action::Player(Command::Next),
        KeyCode::Char('H') => Action::Player(Command::SeekBy(-scrub)),
        KeyCode::Char('L') => Action::Player(Command::SeekBy(scrub)),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            Action::Player(Command::SetVolume(volume + step))
        }
        KeyCode::Char('-') => Action::Player(Command::SetVolume(volume - step)),
        KeyCode::Char('s') => Action::Player(Command::ToggleShuffle),
        KeyCode::Char('r') => Action::Player(Command::ToggleRepeat),
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Enter => Action::SelectCursor,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Render the help line for the footer.
pub fn help_text(controls: &ControlsSettings) -> String {
    HELP.iter()
        .map(|(keys, what)| match *keys {
            "H/L" => format!("[{keys}] {what} -/+{}s", controls.scrub_seconds),
            _ => format!("[{keys}] {what}"),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
