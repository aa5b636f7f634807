//! Application module: the view model the TUI and runtime share.
//!
//! `App` wraps the playback engine together with the bits of terminal state
//! needed to map mouse input onto the progress bar.

mod model;

pub use model::*;
