//! Progress bar adapter: pointer geometry to seek targets and back.

use crate::bridge::AnimationBridge;
use crate::engine::{AudioResource, PlaybackEngine};

/// Seek target for a click `click_offset_x` pixels (or cells) into a bar
/// `track_width` wide. `None` when the duration is unknown or the bar has
/// no width.
pub fn seek_target(click_offset_x: f64, track_width: f64, duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| d.is_finite())?;
    if !(track_width > 0.0) || !click_offset_x.is_finite() {
        return None;
    }
    let fraction = (click_offset_x / track_width).clamp(0.0, 1.0);
    Some(fraction * duration)
}

/// Elapsed share of the track in percent, 0 while the duration is unknown.
pub fn progress_percentage(current_time: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => (current_time / d * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

impl<R: AudioResource, B: AnimationBridge> PlaybackEngine<R, B> {
    /// Seek according to a click on the progress bar. Returns whether a seek
    /// was issued.
    pub fn on_progress_bar_click(&mut self, click_offset_x: f64, track_width: f64) -> bool {
        match seek_target(click_offset_x, track_width, self.state().duration) {
            Some(target) => {
                self.seek(target);
                true
            }
            None => false,
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        let state = self.state();
        progress_percentage(state.current_time, state.duration)
    }
}
