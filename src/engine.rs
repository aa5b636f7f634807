//! Playback engine: the single authority over the audio output resource.
//!
//! Transport operations (`toggle_play`, `skip_next`, `skip_previous`,
//! `seek`) and resource lifecycle notifications both funnel through
//! [`PlaybackEngine`], which owns the only [`AudioResource`] handle and the
//! [`PlaybackState`] everyone else reads snapshots of.

mod controller;
mod resource;
mod state;

pub use controller::*;
pub use resource::*;
pub use state::*;

#[cfg(test)]
mod tests;
