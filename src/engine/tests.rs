use super::*;
use crate::bridge::AnimationBridge;
use crate::catalog::{Catalog, PreloadHint, TrackDescriptor};
use crate::preload::{MetadataProbe, PreloadDepth, PreloadManager, PreloadOptions};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct FakeLog {
    events: Option<EventSink>,
    sources: Vec<(String, SwapId)>,
    loads: usize,
    plays: usize,
    pauses: usize,
    positions: Vec<f64>,
    duration: Option<f64>,
    reject_play: bool,
    releases: usize,
}

/// Resource double that records calls and lets the test emit events.
struct FakeResource {
    log: Rc<RefCell<FakeLog>>,
}

impl AudioResource for FakeResource {
    fn subscribe(&mut self, events: EventSink) {
        self.log.borrow_mut().events = Some(events);
    }

    fn set_source(&mut self, src: &str, swap: SwapId) {
        self.log.borrow_mut().sources.push((src.to_string(), swap));
    }

    fn load(&mut self) {
        self.log.borrow_mut().loads += 1;
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        let mut log = self.log.borrow_mut();
        log.plays += 1;
        if log.reject_play {
            return Err(ResourceError::PlayRejected("autoplay blocked".into()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().pauses += 1;
    }

    fn position(&self) -> f64 {
        self.log.borrow().positions.last().copied().unwrap_or(0.0)
    }

    fn set_position(&mut self, seconds: f64) {
        self.log.borrow_mut().positions.push(seconds);
    }

    fn duration(&self) -> Option<f64> {
        self.log.borrow().duration
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
    }
}

struct RecordingBridge {
    calls: Rc<RefCell<Vec<bool>>>,
}

impl AnimationBridge for RecordingBridge {
    fn set_playing(&mut self, playing: bool) {
        self.calls.borrow_mut().push(playing);
    }
}

struct Harness {
    engine: PlaybackEngine<FakeResource, RecordingBridge>,
    log: Rc<RefCell<FakeLog>>,
    bridge: Rc<RefCell<Vec<bool>>>,
}

impl Harness {
    fn new(len: usize) -> Self {
        Self::with_preload(len, PreloadManager::disabled())
    }

    fn with_preload(len: usize, preload: PreloadManager) -> Self {
        let log = Rc::new(RefCell::new(FakeLog::default()));
        let bridge = Rc::new(RefCell::new(Vec::new()));
        let engine = PlaybackEngine::new(
            catalog(len),
            FakeResource { log: log.clone() },
            RecordingBridge {
                calls: bridge.clone(),
            },
            preload,
            EngineOptions::default(),
        );
        Self {
            engine,
            log,
            bridge,
        }
    }

    fn emit(&self, swap: SwapId, event: ResourceEvent) {
        let sink = self.log.borrow().events.clone().unwrap();
        assert!(sink.emit(swap, event));
    }

    /// Emit `event` for the current source and let the engine apply it.
    fn fire(&mut self, event: ResourceEvent) {
        self.emit(self.engine.current_swap(), event);
        self.engine.pump();
    }

    fn metadata(&mut self, duration: f64) {
        self.fire(ResourceEvent::MetadataLoaded {
            duration: Some(duration),
        });
    }

    fn time(&mut self, position: f64) {
        self.fire(ResourceEvent::TimeUpdate { position });
    }

    fn index(&self) -> usize {
        self.engine.state().current_track_index
    }

    fn last_source(&self) -> String {
        self.log.borrow().sources.last().unwrap().0.clone()
    }
}

fn track(i: usize) -> TrackDescriptor {
    TrackDescriptor {
        title: format!("Track {i}"),
        artist: "Artist".into(),
        album_cover_url: format!("covers/{i}.jpg"),
        audio_src: format!("audio/{i}.mp3"),
        audio_link: None,
        preload_hint: PreloadHint::Metadata,
    }
}

fn catalog(len: usize) -> Catalog {
    Catalog::new((0..len).map(track).collect()).unwrap()
}

#[test]
fn mounts_on_first_track_paused_with_unknown_duration() {
    let h = Harness::new(3);
    let state = h.engine.state();
    assert_eq!(state.current_track_index, 0);
    assert!(!state.is_playing);
    assert_eq!(state.duration, None);
    assert_eq!(state.current_time, 0.0);
    assert!(state.is_loading);

    let log = h.log.borrow();
    assert_eq!(log.sources, vec![("audio/0.mp3".to_string(), h.engine.current_swap())]);
    assert_eq!(log.loads, 1);
    assert_eq!(log.plays, 0);
    assert_eq!(*h.bridge.borrow(), vec![false]);
}

#[test]
fn skip_next_three_times_wraps_to_start() {
    let mut h = Harness::new(3);
    let mut seen = Vec::new();
    for _ in 0..3 {
        h.engine.skip_next();
        seen.push(h.index());
    }
    assert_eq!(seen, vec![1, 2, 0]);
    assert_eq!(h.last_source(), "audio/0.mp3");
}

#[test]
fn skip_next_forces_playback_on_new_source() {
    let mut h = Harness::new(3);
    h.engine.skip_next();

    let state = h.engine.state();
    assert!(state.is_playing);
    assert!(state.is_loading);
    assert_eq!(state.duration, None);
    assert_eq!(h.log.borrow().plays, 1);
    assert_eq!(h.last_source(), "audio/1.mp3");
    assert_eq!(*h.bridge.borrow(), vec![false, true]);
}

#[test]
fn skip_previous_early_in_track_goes_back_and_plays() {
    let mut h = Harness::new(3);
    h.engine.play_index(1);
    h.engine.pause();
    h.time(2.0);

    h.engine.skip_previous();
    assert_eq!(h.index(), 0);
    assert!(h.engine.state().is_playing);
    assert_eq!(h.last_source(), "audio/0.mp3");
}

#[test]
fn skip_previous_late_in_track_restarts_it() {
    let mut h = Harness::new(3);
    h.engine.play_index(1);
    h.metadata(200.0);
    h.time(30.0);
    let sources_before = h.log.borrow().sources.len();

    h.engine.skip_previous();
    let state = h.engine.state();
    assert_eq!(state.current_track_index, 1);
    assert_eq!(state.current_time, 0.0);
    assert_eq!(state.duration, Some(200.0));
    assert_eq!(h.log.borrow().positions.last(), Some(&0.0));
    assert_eq!(h.log.borrow().sources.len(), sources_before);
}

#[test]
fn skip_previous_restart_starts_paused_playback() {
    let mut h = Harness::new(3);
    h.metadata(200.0);
    h.time(30.0);
    let plays = h.log.borrow().plays;

    h.engine.skip_previous();
    assert!(h.engine.state().is_playing);
    assert_eq!(h.log.borrow().plays, plays + 1);
}

#[test]
fn skip_previous_from_first_track_restarts_then_wraps() {
    let mut h = Harness::new(4);
    h.metadata(100.0);
    h.time(10.0);

    h.engine.skip_previous();
    assert_eq!(h.index(), 0);
    assert_eq!(h.engine.state().current_time, 0.0);

    h.time(1.5);
    h.engine.skip_previous();
    assert_eq!(h.index(), 3);
}

#[test]
fn restart_threshold_is_exclusive_at_five_seconds() {
    let mut h = Harness::new(3);
    h.engine.play_index(1);
    h.time(5.0);
    h.engine.skip_previous();
    assert_eq!(h.index(), 1);

    h.time(4.99);
    h.engine.skip_previous();
    assert_eq!(h.index(), 0);
}

#[test]
fn seek_without_duration_is_a_no_op() {
    let mut h = Harness::new(2);
    h.time(12.0);
    h.engine.seek(50.0);
    assert_eq!(h.engine.state().current_time, 12.0);
    assert!(h.log.borrow().positions.is_empty());
}

#[test]
fn seek_clamps_into_track_and_ignores_non_finite_targets() {
    let mut h = Harness::new(2);
    h.metadata(120.0);

    h.engine.seek(500.0);
    assert_eq!(h.engine.state().current_time, 120.0);
    h.engine.seek(-5.0);
    assert_eq!(h.engine.state().current_time, 0.0);

    h.engine.seek(40.0);
    h.engine.seek(f64::NAN);
    h.engine.seek(f64::INFINITY);
    assert_eq!(h.engine.state().current_time, 40.0);
    assert_eq!(h.log.borrow().positions, vec![120.0, 0.0, 40.0]);
}

#[test]
fn repeated_seek_leaves_state_unchanged() {
    let mut h = Harness::new(2);
    h.metadata(120.0);
    h.engine.seek(42.5);
    let after_first = h.engine.state().clone();
    h.engine.seek(42.5);
    assert_eq!(*h.engine.state(), after_first);
}

#[test]
fn seek_by_moves_relative_to_current_time() {
    let mut h = Harness::new(2);
    h.metadata(120.0);
    h.time(30.0);
    h.engine.seek_by(5.0);
    assert_eq!(h.engine.state().current_time, 35.0);
    h.engine.seek_by(-100.0);
    assert_eq!(h.engine.state().current_time, 0.0);
}

#[test]
fn stale_events_from_superseded_swap_are_dropped() {
    let mut h = Harness::new(3);
    let track_a = h.engine.current_swap();
    h.engine.skip_next();
    let track_b = h.engine.current_swap();
    assert_ne!(track_a, track_b);

    h.emit(
        track_a,
        ResourceEvent::MetadataLoaded {
            duration: Some(999.0),
        },
    );
    h.emit(track_a, ResourceEvent::TimeUpdate { position: 50.0 });
    h.emit(track_a, ResourceEvent::Ended);
    assert_eq!(h.engine.pump(), 0);

    let state = h.engine.state();
    assert_eq!(state.current_track_index, 1);
    assert_eq!(state.duration, None);
    assert_eq!(state.current_time, 0.0);
    assert!(state.is_loading);
    assert!(!state.loaded_indices.contains(&0));

    h.emit(
        track_b,
        ResourceEvent::MetadataLoaded {
            duration: Some(180.0),
        },
    );
    assert_eq!(h.engine.pump(), 1);
    assert_eq!(h.engine.state().duration, Some(180.0));
}

#[test]
fn loading_clears_on_metadata_and_follows_buffering() {
    let mut h = Harness::new(2);
    h.engine.skip_next();
    assert!(h.engine.state().is_loading);

    h.metadata(90.0);
    assert!(!h.engine.state().is_loading);

    h.fire(ResourceEvent::Waiting);
    assert!(h.engine.state().is_loading);
    h.fire(ResourceEvent::CanPlay);
    assert!(!h.engine.state().is_loading);
}

#[test]
fn can_play_without_metadata_reads_resource_duration() {
    let mut h = Harness::new(2);
    h.log.borrow_mut().duration = Some(75.0);
    h.fire(ResourceEvent::CanPlay);
    assert_eq!(h.engine.state().duration, Some(75.0));
    assert!(!h.engine.state().is_loading);
}

#[test]
fn non_finite_metadata_duration_stays_unknown() {
    let mut h = Harness::new(2);
    h.fire(ResourceEvent::MetadataLoaded {
        duration: Some(f64::INFINITY),
    });
    assert_eq!(h.engine.state().duration, None);
    assert!(!h.engine.state().is_loading);
}

#[test]
fn metadata_marks_track_loaded() {
    let mut h = Harness::new(3);
    h.metadata(10.0);
    h.engine.skip_next();
    h.metadata(20.0);
    let loaded: Vec<usize> = h.engine.state().loaded_indices.iter().copied().collect();
    assert_eq!(loaded, vec![0, 1]);
}

#[test]
fn time_updates_are_clamped_to_duration() {
    let mut h = Harness::new(2);
    h.metadata(60.0);
    h.time(61.5);
    assert_eq!(h.engine.state().current_time, 60.0);
    h.time(f64::NAN);
    assert_eq!(h.engine.state().current_time, 60.0);
}

#[test]
fn toggle_play_pauses_and_resumes() {
    let mut h = Harness::new(2);
    h.engine.toggle_play();
    assert!(h.engine.state().is_playing);
    h.engine.toggle_play();
    assert!(!h.engine.state().is_playing);

    let log = h.log.borrow();
    assert_eq!(log.plays, 1);
    assert_eq!(log.pauses, 1);
    assert_eq!(*h.bridge.borrow(), vec![false, true, false]);
}

#[test]
fn rejected_play_rolls_back_without_notifying_bridge() {
    let mut h = Harness::new(2);
    h.log.borrow_mut().reject_play = true;
    h.engine.toggle_play();
    assert!(!h.engine.state().is_playing);
    assert_eq!(*h.bridge.borrow(), vec![false]);

    h.log.borrow_mut().reject_play = false;
    h.engine.toggle_play();
    assert!(h.engine.state().is_playing);
}

#[test]
fn late_play_rejection_reverts_to_paused() {
    let mut h = Harness::new(2);
    h.engine.toggle_play();
    h.fire(ResourceEvent::PlayRejected {
        reason: "not allowed".into(),
    });
    let state = h.engine.state();
    assert!(!state.is_playing);
    assert!(!state.is_loading);
    assert_eq!(*h.bridge.borrow(), vec![false, true, false]);
}

#[test]
fn rejected_play_after_swap_clears_loading() {
    let mut h = Harness::new(3);
    h.log.borrow_mut().reject_play = true;
    h.engine.skip_next();
    let state = h.engine.state();
    assert_eq!(state.current_track_index, 1);
    assert!(!state.is_playing);
    assert!(!state.is_loading);
}

#[test]
fn load_failure_clears_loading_and_stops() {
    let mut h = Harness::new(3);
    h.engine.skip_next();
    h.fire(ResourceEvent::LoadFailed {
        reason: "404".into(),
    });
    let state = h.engine.state();
    assert!(!state.is_loading);
    assert!(!state.is_playing);

    h.engine.skip_next();
    assert_eq!(h.index(), 2);
    assert!(h.engine.state().is_playing);
}

#[test]
fn natural_end_advances_and_keeps_playing() {
    let mut h = Harness::new(3);
    h.engine.play_index(2);
    h.metadata(30.0);
    h.time(30.0);
    h.fire(ResourceEvent::Ended);

    let state = h.engine.state();
    assert_eq!(state.current_track_index, 0);
    assert!(state.is_playing);
    assert!(state.is_loading);
    assert_eq!(state.current_time, 0.0);
    assert_eq!(h.last_source(), "audio/0.mp3");
}

#[test]
fn play_index_ignores_out_of_range() {
    let mut h = Harness::new(3);
    h.engine.play_index(7);
    assert_eq!(h.index(), 0);
    assert!(!h.engine.state().is_playing);
}

#[test]
fn progress_click_seeks_proportionally() {
    let mut h = Harness::new(2);
    assert!(!h.engine.on_progress_bar_click(50.0, 200.0));

    h.metadata(120.0);
    assert!(h.engine.on_progress_bar_click(50.0, 200.0));
    assert_eq!(h.engine.state().current_time, 30.0);
    assert!(!h.engine.on_progress_bar_click(50.0, 0.0));
    assert_eq!(h.engine.progress_percentage(), 25.0);
}

#[test]
fn snapshot_mirrors_state() {
    let mut h = Harness::new(2);
    h.metadata(120.0);
    h.time(30.0);
    let snap = h.engine.snapshot();
    assert_eq!(
        snap,
        PlaybackSnapshot {
            current_track_index: 0,
            is_playing: false,
            current_time: 30.0,
            duration: Some(120.0),
            is_loading: false,
        }
    );
}

#[test]
fn shutdown_releases_resource_once() {
    let mut h = Harness::new(2);
    h.engine.toggle_play();
    h.engine.shutdown();
    h.engine.shutdown();
    assert_eq!(h.log.borrow().releases, 1);
    assert!(!h.engine.state().is_playing);

    let log = h.log.clone();
    drop(h);
    assert_eq!(log.borrow().releases, 1);
}

#[test]
fn drop_releases_resource() {
    let h = Harness::new(2);
    let log = h.log.clone();
    drop(h);
    assert_eq!(log.borrow().releases, 1);
}

struct InstantProbe;

impl MetadataProbe for InstantProbe {
    fn warm(&self, _src: &str, _depth: PreloadDepth) -> Result<(), ResourceError> {
        Ok(())
    }
}

#[test]
fn tick_preloads_next_track_after_swap() {
    let preload = PreloadManager::new(
        Arc::new(InstantProbe),
        PreloadOptions {
            delay: Duration::ZERO,
            respect_hints: true,
        },
    );
    let mut h = Harness::with_preload(3, preload);
    assert_eq!(h.engine.preload().scheduled_after(), Some(0));

    let deadline = Instant::now() + Duration::from_secs(5);
    while !h.engine.state().loaded_indices.contains(&1) && Instant::now() < deadline {
        h.engine.tick(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(h.engine.state().loaded_indices.contains(&1));
    assert_eq!(h.engine.preload().in_flight(), 0);

    h.engine.skip_next();
    assert_eq!(h.engine.preload().scheduled_after(), Some(1));
}

proptest! {
    #[test]
    fn index_stays_in_range(len in 1usize..6, ops in prop::collection::vec(0u8..9, 0..64)) {
        let mut h = Harness::new(len);
        for op in ops {
            match op {
                0 => h.engine.toggle_play(),
                1 => h.engine.skip_next(),
                2 => h.engine.skip_previous(),
                3 => h.engine.seek(17.0),
                4 => h.metadata(40.0),
                5 => h.time(3.0),
                6 => h.time(12.0),
                7 => h.fire(ResourceEvent::Ended),
                _ => h.fire(ResourceEvent::LoadFailed { reason: "gone".into() }),
            }
            let state = h.engine.state();
            prop_assert!(state.current_track_index < len);
            prop_assert!(state.loaded_indices.iter().all(|&i| i < len));
        }
    }
}
