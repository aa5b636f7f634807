//! Playback controller for a single "now playing" box.
//!
//! A fixed [`catalog::Catalog`] of tracks feeds a [`engine::PlaybackEngine`]
//! that owns exactly one [`engine::AudioResource`]. The engine speculatively
//! warms the next track through [`preload::PreloadManager`], exposes a
//! progress bar adapter in [`progress`] and mirrors play state into an
//! [`bridge::AnimationBridge`].
//!
//! [`audio::RodioResource`] is the local-output backend used by the
//! `bento-player` binary.

pub mod audio;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod preload;
pub mod progress;
