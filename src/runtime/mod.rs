use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::audio::RodioSink;
use crate::library::{Playlist, scan};
use crate::mpris::ControlCmd;
use crate::player::PlaybackController;
use crate::ui::{ViewObserver, ViewState};

mod event_loop;
mod logging;
mod settings;
mod startup;

fn music_dir() -> PathBuf {
    env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
    })
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    match logging::init(&settings.log) {
        Ok(Some(path)) => info!(path = %path.display(), "logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("turntable: logging disabled: {e}"),
    }

    let dir = music_dir();
    let tracks = scan(&dir, &settings.library);
    info!(dir = %dir.display(), tracks = tracks.len(), "library scanned");
    let playlist = Playlist::new(tracks)
        .map_err(|e| format!("no playable files in {}: {e}", dir.display()))?;

    let view = Rc::new(RefCell::new(ViewState::new(
        playlist.len(),
        settings.ui.visualizer_bars,
    )));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let mut controller = PlaybackController::new(playlist, RodioSink::new());
    controller.subscribe(Box::new(ViewObserver(view.clone())));
    controller.subscribe(Box::new(mpris));
    startup::apply_playback_defaults(&mut controller, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut controller, &view, &control_rx);

    controller.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("bye");
    run_result
}
