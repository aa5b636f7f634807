//! Speculative warming of the next track.
//!
//! After every source swap the engine schedules a preload of the following
//! catalog entry. The preload runs once the host is idle and the configured
//! delay has passed, on a short-lived worker thread with its own probe, so
//! it never touches the playback resource. Failures are dropped.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::catalog::{Catalog, PreloadHint};
use crate::engine::ResourceError;

/// How much of a source to fetch ahead of time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PreloadDepth {
    Metadata,
    Full,
}

impl PreloadDepth {
    /// Depth for a track's hint, or `None` when it must not be warmed.
    pub fn for_hint(hint: PreloadHint, respect_hints: bool) -> Option<Self> {
        if !respect_hints {
            return Some(Self::Metadata);
        }
        match hint {
            PreloadHint::None => None,
            PreloadHint::Metadata => Some(Self::Metadata),
            PreloadHint::Auto => Some(Self::Full),
        }
    }
}

/// A throwaway handle able to fetch a source ahead of playback.
pub trait MetadataProbe: Send + Sync {
    fn warm(&self, src: &str, depth: PreloadDepth) -> Result<(), ResourceError>;
}

#[derive(Debug, Copy, Clone)]
pub struct PreloadOptions {
    /// Delay between a source swap and the preload it schedules.
    pub delay: Duration,
    /// Honour per-track `preload_hint`s. When off, every track gets a
    /// metadata preload.
    pub respect_hints: bool,
}

impl Default for PreloadOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            respect_hints: true,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Scheduled {
    after_index: usize,
    due: Instant,
}

struct Warmed {
    index: usize,
    result: Result<(), ResourceError>,
}

pub struct PreloadManager {
    probe: Option<Arc<dyn MetadataProbe>>,
    options: PreloadOptions,
    scheduled: Option<Scheduled>,
    in_flight: BTreeSet<usize>,
    tx: Sender<Warmed>,
    rx: Receiver<Warmed>,
}

impl PreloadManager {
    pub fn new(probe: Arc<dyn MetadataProbe>, options: PreloadOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe: Some(probe),
            options,
            scheduled: None,
            in_flight: BTreeSet::new(),
            tx,
            rx,
        }
    }

    /// A manager that never preloads anything.
    pub fn disabled() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe: None,
            options: PreloadOptions::default(),
            scheduled: None,
            in_flight: BTreeSet::new(),
            tx,
            rx,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.probe.is_some()
    }

    /// Index whose successor is waiting to be preloaded, if any.
    pub fn scheduled_after(&self) -> Option<usize> {
        self.scheduled.map(|s| s.after_index)
    }

    /// Number of preloads started and not yet reported back.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Schedule a preload of the track after `current_index`. A newer
    /// schedule replaces one that has not run yet.
    pub fn schedule_after_swap(&mut self, current_index: usize, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        self.scheduled = Some(Scheduled {
            after_index: current_index,
            due: now + self.options.delay,
        });
    }

    /// Run the scheduled preload when its delay has elapsed. Meant to be
    /// called from the host's idle path.
    pub fn run_due(&mut self, now: Instant, catalog: &Catalog, loaded: &BTreeSet<usize>) -> bool {
        match self.scheduled {
            Some(s) if now >= s.due => {
                self.scheduled = None;
                self.preload_next(s.after_index, catalog, loaded)
            }
            _ => false,
        }
    }

    /// Start warming the track after `current_index` unless it is already
    /// loaded, already being warmed, or hinted as `none`. Returns whether a
    /// preload was started.
    pub fn preload_next(
        &mut self,
        current_index: usize,
        catalog: &Catalog,
        loaded: &BTreeSet<usize>,
    ) -> bool {
        let Some(probe) = self.probe.as_ref() else {
            return false;
        };

        let next = catalog.next_index(current_index);
        if loaded.contains(&next) || self.in_flight.contains(&next) {
            return false;
        }

        let track = catalog.track(next);
        let Some(depth) = PreloadDepth::for_hint(track.preload_hint, self.options.respect_hints)
        else {
            debug!(index = next, "preload skipped by hint");
            return false;
        };

        let probe = Arc::clone(probe);
        let tx = self.tx.clone();
        let src = track.audio_src.clone();
        let spawned = thread::Builder::new()
            .name("preload".into())
            .spawn(move || {
                let result = probe.warm(&src, depth);
                let _ = tx.send(Warmed {
                    index: next,
                    result,
                });
            });

        match spawned {
            Ok(_) => {
                debug!(index = next, ?depth, "preload started");
                self.in_flight.insert(next);
                true
            }
            Err(err) => {
                debug!(index = next, %err, "failed to spawn preload worker");
                false
            }
        }
    }

    /// Indices whose preload finished successfully since the last call.
    pub fn poll_completed(&mut self) -> Vec<usize> {
        let mut done = Vec::new();
        while let Ok(Warmed { index, result }) = self.rx.try_recv() {
            self.in_flight.remove(&index);
            match result {
                Ok(()) => {
                    debug!(index, "preload finished");
                    done.push(index);
                }
                Err(err) => debug!(index, %err, "preload failed"),
            }
        }
        done
    }
}
