//! Configuration loader and schema types.
//!
//! Settings drive the engine thresholds, the preload policy, audio output,
//! the terminal UI and logging. They are read from an optional TOML file
//! and environment overrides on top of struct defaults.

mod load;
mod schema;

pub use load::*;
pub use schema::*;
