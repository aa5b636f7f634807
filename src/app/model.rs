//! Application model: `App` and the progress bar hit-testing it performs.

use bento_player::bridge::MorphIcon;
use bento_player::engine::{AudioResource, PlaybackEngine};
use ratatui::layout::Rect;

/// The main application model.
pub struct App<R: AudioResource> {
    pub engine: PlaybackEngine<R, MorphIcon>,
    /// Catalog file or directory the tracks came from.
    pub source_label: String,
    /// Where the progress bar was last drawn, in terminal cells.
    pub progress_area: Option<Rect>,
    /// Whether the mouse is over the progress bar. Styling only.
    pub hovering_progress: bool,
}

impl<R: AudioResource> App<R> {
    pub fn new(engine: PlaybackEngine<R, MorphIcon>, source_label: String) -> Self {
        Self {
            engine,
            source_label,
            progress_area: None,
            hovering_progress: false,
        }
    }

    /// Record where the progress bar was rendered.
    pub fn set_progress_area(&mut self, area: Rect) {
        self.progress_area = Some(area);
    }

    /// Offset and width of the progress bar for a pointer at
    /// (`column`, `row`), or `None` when the pointer is outside it.
    pub fn progress_hit(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.progress_area?;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        if !inside {
            return None;
        }
        Some(((column - area.x) as f64, area.width as f64))
    }

    /// Seek for a click at (`column`, `row`). Returns whether a seek happened.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        match self.progress_hit(column, row) {
            Some((offset, width)) => self.engine.on_progress_bar_click(offset, width),
            None => false,
        }
    }

    pub fn hover(&mut self, column: u16, row: u16) {
        self.hovering_progress = self.progress_hit(column, row).is_some();
    }
}
