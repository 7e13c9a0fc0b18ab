//! Terminal rendering with `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{TimeField, UiSettings};
use crate::library::Playlist;

mod view;
mod visualizer;

pub use view::{ViewHandle, ViewObserver, ViewState};

/// Format whole seconds as `m:ss`.
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Progress label built from the configured time fields. `total` is 0 when
/// the duration is unknown; fields that need it are skipped.
fn time_text(elapsed: u64, total: u64, ui: &UiSettings) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|field| match field {
            TimeField::Elapsed => Some(format_time(elapsed)),
            TimeField::Total if total > 0 => Some(format_time(total)),
            TimeField::Remaining if total > 0 => {
                Some(format!("-{}", format_time(total.saturating_sub(elapsed))))
            }
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn progress_ratio(elapsed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn padded(title: &str) -> Block<'_> {
    Block::bordered()
        .title(title)
        .padding(Padding::horizontal(1))
}

/// Render the whole screen.
pub fn draw(frame: &mut Frame, view: &ViewState, playlist: &Playlist, ui: &UiSettings, help: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" turntable ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let Some(snapshot) = view.snapshot.as_ref() else {
        return;
    };
    let state = &snapshot.state;
    let track = &snapshot.track;

    let status = if state.is_playing { "Playing" } else { "Paused" };
    let now_playing = Paragraph::new(vec![
        Line::from(format!(
            "{} {}  {}",
            view.vinyl(),
            track.cover_glyph(),
            track.title
        ))
        .bold(),
        Line::from(format!("   {}", track.artist)),
        Line::from(format!(
            "   {status} • shuffle: {} • repeat: {} • volume: {}%",
            on_off(state.is_shuffled),
            on_off(state.is_repeated),
            state.volume_percent
        )),
    ])
    .block(padded(" now playing "))
    .wrap(Wrap { trim: false });
    frame.render_widget(now_playing, chunks[1]);

    let label = time_text(state.position_secs, snapshot.duration_secs, ui).unwrap_or_default();
    let gauge = Gauge::default()
        .block(Block::bordered())
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(progress_ratio(state.position_secs, snapshot.duration_secs))
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    let bars = Paragraph::new(view.visualizer.render())
        .alignment(Alignment::Center)
        .block(Block::bordered());
    frame.render_widget(bars, chunks[3]);

    let items: Vec<ListItem> = playlist
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if i == state.current_index { "♪ " } else { "  " };
            let length = match t.duration_secs {
                0 => "-:--".to_string(),
                secs => format_time(secs),
            };
            let item = ListItem::new(format!("{marker}{} - {}  [{length}]", t.title, t.artist));
            if i == state.current_index {
                item.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(view.cursor));
    frame.render_stateful_widget(list, chunks[4], &mut list_state);

    let footer_text = match &view.last_error {
        Some(err) => format!("{help}\nerror: {err}"),
        None => help.to_string(),
    };
    let footer = Paragraph::new(footer_text)
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
