//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use bento_player::config::{Settings, TimeField, UiSettings};
use bento_player::engine::{AudioResource, PlaybackState};

use crate::app::App;

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{}s", scrub_seconds),
        "[click bar] seek".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format seconds as `MM:SS`. Negative and non-finite values render as zero.
fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the progress bar label (elapsed/total/remaining/percent) per `UiSettings`.
fn time_text(state: &PlaybackState, percent: f64, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(state.current_time)),
            TimeField::Total => {
                if let Some(d) = state.duration {
                    parts.push(format_mmss(d));
                }
            }
            TimeField::Remaining => {
                if let Some(d) = state.duration {
                    parts.push(format!("-{}", format_mmss(d - state.current_time)));
                }
            }
            TimeField::Percent => {
                if state.duration.is_some() {
                    parts.push(format!("{:.0}%", percent));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

fn status_text(state: &PlaybackState) -> &'static str {
    match (state.is_loading, state.is_playing) {
        (true, _) => "Loading",
        (false, true) => "Playing",
        (false, false) => "Paused",
    }
}

/// Render the entire UI into `frame`. Returns the area the progress bar
/// occupies so mouse clicks can be mapped back onto it.
pub fn draw<R: AudioResource>(frame: &mut Frame, app: &App<R>, settings: &Settings) -> Rect {
    let ui = &settings.ui;
    let engine = &app.engine;
    let state = engine.state();
    let track = engine.current_track();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if ui.show_links { 6 } else { 4 }),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" bento-player ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let mut lines = vec![
        format!("{} {}", engine.bridge().glyph(), track.title),
        if track.artist.trim().is_empty() {
            "-".to_string()
        } else {
            track.artist.clone()
        },
    ];
    if ui.show_links {
        if !track.album_cover_url.trim().is_empty() {
            lines.push(format!("Cover: {}", track.album_cover_url));
        }
        if let Some(link) = track.audio_link.as_deref().filter(|l| !l.trim().is_empty()) {
            lines.push(format!("Link: {}", link));
        }
    }
    let title = format!(
        " {} • {}/{} • preloaded {} • {} ",
        status_text(state),
        state.current_track_index + 1,
        engine.catalog().len(),
        state.loaded_indices.len(),
        app.source_label,
    );
    let now_playing = Paragraph::new(lines.join("\n"))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(title),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    // Progress
    let percent = engine.progress_percentage();
    let block = Block::default().borders(Borders::ALL).title(" progress ");
    let bar_area = block.inner(chunks[2]);
    let mut gauge = Gauge::default()
        .block(block)
        .ratio((percent / 100.0).clamp(0.0, 1.0));
    if let Some(label) = time_text(state, percent, ui) {
        gauge = gauge.label(label);
    }
    gauge = if app.hovering_progress {
        gauge.gauge_style(Style::default().add_modifier(Modifier::BOLD)).cyan()
    } else {
        gauge.gauge_style(Style::default())
    };
    frame.render_widget(gauge, chunks[2]);

    // Track list, centred on the current track when it does not fit.
    {
        let total = engine.catalog().len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let current = state.current_track_index;
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = current.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = engine
            .catalog()
            .iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, t)| {
                let marker = if state.loaded_indices.contains(&i) {
                    "·"
                } else {
                    " "
                };
                ListItem::new(format!("{} {}", marker, t.display()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(current - start));
        }
        frame.render_stateful_widget(list, chunks[3], &mut list_state);
    }

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
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
    frame.render_widget(footer, chunks[4]);

    bar_area
}
