use std::sync::mpsc::Receiver;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::bridge::AnimationBridge;
use crate::catalog::{Catalog, TrackDescriptor};
use crate::preload::PreloadManager;

use super::resource::{AudioResource, Notification, ResourceEvent, SwapId, event_channel};
use super::state::{PlaybackSnapshot, PlaybackState};

/// Seconds into a track under which "previous" goes to the previous track
/// instead of restarting the current one.
pub const DEFAULT_RESTART_THRESHOLD_SECS: f64 = 5.0;

#[derive(Debug, Copy, Clone)]
pub struct EngineOptions {
    pub restart_threshold: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            restart_threshold: DEFAULT_RESTART_THRESHOLD_SECS,
        }
    }
}

/// Owns the audio resource and applies every state transition.
pub struct PlaybackEngine<R: AudioResource, B: AnimationBridge> {
    catalog: Catalog,
    resource: R,
    bridge: B,
    preload: PreloadManager,
    options: EngineOptions,
    state: PlaybackState,
    swap: SwapId,
    events: Receiver<Notification>,
    bridged: Option<bool>,
    released: bool,
}

impl<R: AudioResource, B: AnimationBridge> PlaybackEngine<R, B> {
    /// Take ownership of `resource` and point it at the first track.
    pub fn new(
        catalog: Catalog,
        mut resource: R,
        bridge: B,
        preload: PreloadManager,
        options: EngineOptions,
    ) -> Self {
        let (sink, events) = event_channel();
        resource.subscribe(sink);

        let mut engine = Self {
            catalog,
            resource,
            bridge,
            preload,
            options,
            state: PlaybackState::default(),
            swap: SwapId::default(),
            events,
            bridged: None,
            released: false,
        };
        engine.swap_source();
        engine
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.snapshot()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> &TrackDescriptor {
        self.catalog.track(self.state.current_track_index)
    }

    /// Swap that events must carry to be applied.
    pub fn current_swap(&self) -> SwapId {
        self.swap
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn preload(&self) -> &PreloadManager {
        &self.preload
    }

    /// Pause when playing, otherwise request playback.
    pub fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.start_playback();
        }
    }

    pub fn play(&mut self) {
        if !self.state.is_playing {
            self.start_playback();
        }
    }

    pub fn pause(&mut self) {
        if self.state.is_playing {
            self.resource.pause();
            self.state.is_playing = false;
            self.sync_bridge();
        }
    }

    /// Advance to the next track, wrapping to the first. Always plays.
    pub fn skip_next(&mut self) {
        let next = self.catalog.next_index(self.state.current_track_index);
        self.change_track(next);
    }

    /// Restart the current track, or go to the previous one when less than
    /// the restart threshold has elapsed.
    pub fn skip_previous(&mut self) {
        if self.state.current_time < self.options.restart_threshold {
            let prev = self.catalog.prev_index(self.state.current_track_index);
            self.change_track(prev);
            return;
        }

        self.resource.set_position(0.0);
        self.state.current_time = 0.0;
        if !self.state.is_playing {
            self.start_playback();
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn play_index(&mut self, index: usize) {
        if index < self.catalog.len() {
            self.change_track(index);
        }
    }

    /// Move to `target` seconds, clamped into the track. Ignored while the
    /// duration is unknown or when `target` is not finite.
    pub fn seek(&mut self, target: f64) {
        let Some(duration) = self.state.duration.filter(|d| d.is_finite()) else {
            return;
        };
        if !target.is_finite() {
            return;
        }

        let target = target.clamp(0.0, duration);
        self.resource.set_position(target);
        self.state.current_time = target;
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.state.current_time + delta);
    }

    /// Apply every queued resource notification. Returns how many were
    /// applied (stale ones are not counted).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(note) = self.events.try_recv() {
            if self.apply(note) {
                applied += 1;
            }
        }
        applied
    }

    /// Run idle-time work: the scheduled preload and its completions.
    pub fn tick(&mut self, now: Instant) {
        self.preload
            .run_due(now, &self.catalog, &self.state.loaded_indices);
        for index in self.preload.poll_completed() {
            self.state.loaded_indices.insert(index);
        }
    }

    /// State transition for a single notification. Returns `false` when the
    /// notification belongs to a superseded swap and was dropped.
    pub fn apply(&mut self, note: Notification) -> bool {
        if note.swap != self.swap {
            debug!(
                stale = note.swap.get(),
                current = self.swap.get(),
                event = ?note.event,
                "dropping stale resource event"
            );
            return false;
        }

        match note.event {
            ResourceEvent::MetadataLoaded { duration } => {
                self.state.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
                self.state
                    .loaded_indices
                    .insert(self.state.current_track_index);
                self.state.is_loading = false;
            }
            ResourceEvent::TimeUpdate { position } => {
                if position.is_finite() {
                    let position = position.max(0.0);
                    self.state.current_time = match self.state.duration {
                        Some(d) => position.min(d),
                        None => position,
                    };
                }
            }
            ResourceEvent::Waiting => {
                self.state.is_loading = true;
            }
            ResourceEvent::CanPlay => {
                self.state.is_loading = false;
                if self.state.duration.is_none() {
                    self.state.duration = self
                        .resource
                        .duration()
                        .filter(|d| d.is_finite() && *d >= 0.0);
                }
            }
            ResourceEvent::Ended => {
                info!(index = self.state.current_track_index, "track ended");
                self.skip_next();
            }
            ResourceEvent::PlayRejected { reason } => {
                warn!(%reason, "playback rejected");
                self.state.is_loading = false;
                self.state.is_playing = false;
                self.sync_bridge();
            }
            ResourceEvent::LoadFailed { reason } => {
                warn!(
                    %reason,
                    src = %self.current_track().audio_src,
                    "failed to load track"
                );
                self.state.is_loading = false;
                self.state.is_playing = false;
                self.sync_bridge();
            }
        }
        true
    }

    /// Release the resource. Further transport calls still update state but
    /// no longer reach an output.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.resource.release();
        if self.state.is_playing {
            self.state.is_playing = false;
            self.sync_bridge();
        }
    }

    fn change_track(&mut self, index: usize) {
        self.state.current_track_index = index;
        self.state.is_playing = true;
        self.swap_source();
    }

    fn start_playback(&mut self) {
        self.state.is_playing = true;
        if let Err(err) = self.resource.play() {
            warn!(%err, "play request rejected");
            self.state.is_playing = false;
        }
        self.sync_bridge();
    }

    /// Point the resource at the current track and, when playing, request
    /// playback on it straight away.
    fn swap_source(&mut self) {
        self.swap = self.swap.next();
        self.state.is_loading = true;
        self.state.current_time = 0.0;
        self.state.duration = None;

        let index = self.state.current_track_index;
        let src = self.catalog.track(index).audio_src.clone();
        info!(index, %src, swap = self.swap.get(), "source swap");

        self.resource.set_source(&src, self.swap);
        self.resource.load();

        if self.state.is_playing {
            if let Err(err) = self.resource.play() {
                warn!(%err, %src, "play request rejected after source swap");
                self.state.is_playing = false;
                self.state.is_loading = false;
            }
        }
        self.sync_bridge();

        self.preload.schedule_after_swap(index, Instant::now());
    }

    fn sync_bridge(&mut self) {
        if self.bridged != Some(self.state.is_playing) {
            self.bridged = Some(self.state.is_playing);
            self.bridge.set_playing(self.state.is_playing);
        }
    }
}

impl<R: AudioResource, B: AnimationBridge> Drop for PlaybackEngine<R, B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
