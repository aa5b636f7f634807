use std::collections::BTreeSet;

/// Transport state owned by the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    /// Index into the catalog; always in range.
    pub current_track_index: usize,
    pub is_playing: bool,
    /// Seconds into the current track.
    pub current_time: f64,
    /// Track length in seconds, `None` until metadata arrives.
    pub duration: Option<f64>,
    /// True between a source swap and the resource becoming playable.
    pub is_loading: bool,
    /// Catalog entries whose metadata has been fetched at least once.
    pub loaded_indices: BTreeSet<usize>,
}

impl PlaybackState {
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track_index: self.current_track_index,
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            is_loading: self.is_loading,
        }
    }
}

/// Read-only view handed to renderers.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub current_track_index: usize,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub is_loading: bool,
}
