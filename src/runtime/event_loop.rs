use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::AudioSink;
use crate::config;
use crate::keymap::{self, Action};
use crate::mpris::ControlCmd;
use crate::player::{Command, PlaybackController};
use crate::ui::{self, ViewHandle};

const INPUT_POLL: Duration = Duration::from_millis(50);

fn dispatch<S: AudioSink>(controller: &mut PlaybackController<S>, command: Command) {
    if let Err(e) = controller.dispatch(command) {
        warn!(error = %e, ?command, "command rejected");
    }
}

/// Apply a remote command. Returns `true` when shutdown is requested.
fn handle_control_cmd<S: AudioSink>(
    cmd: ControlCmd,
    controller: &mut PlaybackController<S>,
) -> bool {
    if cmd == ControlCmd::Quit {
        return true;
    }
    if let Some(command) = cmd.into_command(controller.state()) {
        dispatch(controller, command);
    }
    false
}

/// Apply a key press. Returns `true` when shutdown is requested.
fn handle_key_event<S: AudioSink>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaybackController<S>,
    view: &ViewHandle,
) -> bool {
    let Some(action) = keymap::action_for(key, controller.state(), &settings.controls) else {
        return false;
    };
    match action {
        Action::Quit => return true,
        Action::Player(command) => dispatch(controller, command),
        Action::CursorUp => view.borrow_mut().cursor_up(),
        Action::CursorDown => view.borrow_mut().cursor_down(),
        Action::SelectCursor => {
            let cursor = view.borrow().cursor;
            if cursor != controller.state().current_index {
                dispatch(controller, Command::SelectTrack(cursor));
            }
            // Selecting from the list always starts playback.
            if !controller.state().is_playing {
                dispatch(controller, Command::Play);
            }
        }
    }
    false
}

/// Main loop: remote commands, sink events, animation, drawing, keys.
/// Returns once quit is requested; the caller releases the sink.
pub fn run<S: AudioSink>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlaybackController<S>,
    view: &ViewHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let help = keymap::help_text(&settings.controls);
    let tick = Duration::from_millis(settings.ui.animation_tick_ms);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                info!("quit requested over MPRIS");
                return Ok(());
            }
        }

        controller.poll_sink();

        if last_tick.elapsed() >= tick {
            view.borrow_mut().tick();
            last_tick = Instant::now();
        }

        terminal.draw(|f| {
            ui::draw(f, &view.borrow(), controller.playlist(), &settings.ui, &help)
        })?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, controller, view) {
                    info!("quit requested from keyboard");
                    return Ok(());
                }
            }
        }
    }
}
