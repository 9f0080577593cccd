//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Focus};
use crate::config::{TimeField, UiSettings};
use crate::library::display_from_fields;
use crate::queue::PlaybackState;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("tab", "switch pane"),
    ("enter", "play album"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next track"),
    ("d", "remove track"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn status_text(app: &App, ui: &UiSettings) -> String {
    let snapshot = &app.now_playing;
    let Some(track) = snapshot.current.as_ref() else {
        return format!("Stopped • {} albums", app.library.albums().len());
    };

    // Only trust the elapsed time once the audio thread holds this track.
    let elapsed = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok())
        .filter(|info| info.track == Some(track.id))
        .map(|info| info.elapsed)
        .unwrap_or_default();

    let song = display_from_fields(
        track,
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    );
    let mut parts = vec![match now_playing_time_text(elapsed, track.duration, ui) {
        Some(time) => format!("Now: {song} [{time}]"),
        None => format!("Now: {song}"),
    }];

    if let Some(pos) = snapshot.position {
        parts.push(format!("Track {}/{}", pos + 1, snapshot.len));
    }
    parts.push(
        match snapshot.state {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        }
        .to_string(),
    );
    parts.join(" • ")
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

fn draw_albums(frame: &mut Frame, app: &App, area: Rect) {
    let playing_album = app
        .now_playing
        .current
        .as_ref()
        .map(|t| (t.album.as_str(), t.artist.as_str()));

    let items: Vec<ListItem> = app
        .library
        .albums()
        .iter()
        .map(|a| {
            let marker = if playing_album == Some((a.title.as_str(), a.artist.as_str())) {
                "♪ "
            } else {
                "  "
            };
            let art = if a.artwork.is_some() { " [art]" } else { "" };
            ListItem::new(format!(
                "{marker}{} - {} ({}){art}",
                a.artist,
                a.title,
                a.tracks.len()
            ))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" albums ", app.focus == Focus::Albums))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.selected_album_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_tracks(frame: &mut Frame, app: &App, area: Rect) {
    let playing = app.now_playing.current.as_ref().map(|t| t.id);

    let items: Vec<ListItem> = app
        .selected_album()
        .map(|a| a.tracks.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|t| {
            let marker = if playing == Some(t.id) { "▶ " } else { "  " };
            let number = t
                .track_number
                .map(|n| format!("{n:>2}. "))
                .unwrap_or_else(|| "    ".to_string());
            let duration = t
                .duration
                .map(|d| format!("  {}", format_mmss(d)))
                .unwrap_or_default();
            ListItem::new(format!("{marker}{number}{}{duration}", t.title))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" tracks ", app.focus == Focus::Tracks))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.focus == Focus::Tracks && app.selected_track().is_some() {
        state.select(Some(app.selected_track_index()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_empty(frame: &mut Frame, area: Rect) {
    let text = "No Albums\n\nImport tracks to build your library.";
    let empty = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" albums "))
        .wrap(Wrap { trim: true });
    frame.render_widget(empty, area);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cdcase ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, ui_settings))
        .bold()
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    if app.has_albums() {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[2]);
        draw_albums(frame, app, panes[0]);
        draw_tracks(frame, app, panes[1]);
    } else {
        draw_empty(frame, chunks[2]);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests;
