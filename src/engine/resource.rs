//! The audio resource collaborator and the notifications it emits.

use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;

/// Identity of one source swap. Every notification carries the swap it
/// belongs to so the engine can drop events from superseded sources.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwapId(u64);

impl SwapId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle events reported by an audio resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Metadata is available; `duration` is `None` when the resource cannot
    /// tell its length (live streams, some containers).
    MetadataLoaded { duration: Option<f64> },
    /// Playback position advanced to `position` seconds.
    TimeUpdate { position: f64 },
    /// The track played through to its end.
    Ended,
    /// Playback stalled waiting for data.
    Waiting,
    /// Enough data is buffered to play.
    CanPlay,
    /// A play request that was accepted earlier was refused.
    PlayRejected { reason: String },
    /// The source could not be loaded at all.
    LoadFailed { reason: String },
}

/// A [`ResourceEvent`] tagged with the swap it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub swap: SwapId,
    pub event: ResourceEvent,
}

/// Sending half of the engine's event queue, handed to the resource.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<Notification>,
}

impl EventSink {
    /// Queue `event` for `swap`. Returns `false` once the engine is gone.
    pub fn emit(&self, swap: SwapId, event: ResourceEvent) -> bool {
        self.tx.send(Notification { swap, event }).is_ok()
    }
}

/// Create a connected event sink and receiver.
pub fn event_channel() -> (EventSink, Receiver<Notification>) {
    let (tx, rx) = mpsc::channel();
    (EventSink { tx }, rx)
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("play request rejected: {0}")]
    PlayRejected(String),

    #[error("unsupported source {0:?}")]
    UnsupportedSource(String),

    #[error("failed to open {src:?}: {source}")]
    Open {
        src: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {src:?}: {reason}")]
    Decode { src: String, reason: String },

    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),

    #[error("audio worker has shut down")]
    Disconnected,
}

/// Capabilities the engine needs from an audio output handle.
///
/// Implementations report lifecycle changes asynchronously through the
/// [`EventSink`] passed to [`subscribe`](AudioResource::subscribe), tagging
/// each event with the [`SwapId`] of the source it concerns.
pub trait AudioResource {
    fn subscribe(&mut self, events: EventSink);

    /// Point the resource at `src`. Events for this source carry `swap`.
    fn set_source(&mut self, src: &str, swap: SwapId);

    /// Start fetching the current source.
    fn load(&mut self);

    /// Request playback. `Ok` means the request was accepted; a later
    /// refusal arrives as [`ResourceEvent::PlayRejected`].
    fn play(&mut self) -> Result<(), ResourceError>;

    fn pause(&mut self);

    /// Current position in seconds.
    fn position(&self) -> f64;

    fn set_position(&mut self, seconds: f64);

    /// Duration in seconds, once known.
    fn duration(&self) -> Option<f64>;

    /// Release the underlying output. Called once on engine teardown.
    fn release(&mut self);
}

impl<T: AudioResource + ?Sized> AudioResource for Box<T> {
    fn subscribe(&mut self, events: EventSink) {
        (**self).subscribe(events)
    }

    fn set_source(&mut self, src: &str, swap: SwapId) {
        (**self).set_source(src, swap)
    }

    fn load(&mut self) {
        (**self).load()
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn position(&self) -> f64 {
        (**self).position()
    }

    fn set_position(&mut self, seconds: f64) {
        (**self).set_position(seconds)
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
