use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::{DEFAULT_RESTART_THRESHOLD_SECS, EngineOptions};
use crate::preload::PreloadOptions;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/bento-player/config.toml` or
/// `~/.config/bento-player/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BENTO_PLAYER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub preload: PreloadSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// "Previous" restarts the current track once this many seconds have
    /// played, and goes to the previous track before that.
    pub restart_threshold_secs: f64,
    /// How often the audio worker reports the playback position (milliseconds).
    pub time_update_ms: u64,
    /// Event loop poll interval; idle work runs when a poll times out (milliseconds).
    pub tick_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            restart_threshold_secs: DEFAULT_RESTART_THRESHOLD_SECS,
            time_update_ms: 250,
            tick_ms: 50,
        }
    }
}

impl EngineSettings {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            restart_threshold: self.restart_threshold_secs,
        }
    }

    pub fn time_update(&self) -> Duration {
        Duration::from_millis(self.time_update_ms.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreloadSettings {
    /// Whether the next track is warmed ahead of time at all.
    pub enabled: bool,
    /// Delay after a track change before the next track is warmed (milliseconds).
    pub delay_ms: u64,
    /// Honour each track's `preload_hint`. When off, every track gets a
    /// metadata-only preload.
    pub respect_hints: bool,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 250,
            respect_hints: true,
        }
    }
}

impl PreloadSettings {
    pub fn options(&self) -> PreloadOptions {
        PreloadOptions {
            delay: Duration::from_millis(self.delay_ms),
            respect_hints: self.respect_hints,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume, 1.0 being unchanged.
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,

    /// Whether to show the cover art reference and outbound link.
    pub show_links: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ now playing ~ ".to_string(),
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
            show_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
    Percent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog file or music directory used when none is given on the
    /// command line.
    pub path: Option<PathBuf>,
    /// File extensions to treat as audio when scanning (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file; defaults to `$XDG_STATE_HOME/bento-player/bento-player.log`.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "bento_player=info".to_string(),
        }
    }
}
