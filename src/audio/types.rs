//! Commands and shared state between `RodioResource` and its worker.

use std::sync::{Arc, Mutex};

use crate::engine::{EventSink, SwapId};

pub(super) enum AudioCmd {
    /// Deliver lifecycle events to this sink from now on.
    Subscribe(EventSink),
    /// Open `src` paused at 0, replacing the current sink.
    Load { src: String, swap: SwapId },
    Play,
    Pause,
    /// Move to the given position in seconds.
    Seek(f64),
    /// Stop the worker, fading out over `fade_out_ms` milliseconds first.
    Quit { fade_out_ms: u64 },
}

/// Last known state of the output, readable without a round-trip to the
/// worker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceInfo {
    pub swap: SwapId,
    pub position: f64,
    pub duration: Option<f64>,
    pub playing: bool,
}

pub(super) type ResourceHandle = Arc<Mutex<ResourceInfo>>;
