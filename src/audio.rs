//! Local audio output backed by `rodio`.
//!
//! [`RodioResource`] implements [`AudioResource`](crate::engine::AudioResource)
//! on top of a worker thread that owns the output stream and the current
//! `Sink`. The worker reports lifecycle events back to the engine tagged
//! with the swap they belong to. [`LocalProbe`] warms files for the
//! preload manager.

mod player;
mod probe;
mod sink;
mod thread;
mod types;

pub use player::RodioResource;
pub use probe::LocalProbe;
pub use sink::source_path;
pub use types::ResourceInfo;
