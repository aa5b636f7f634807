use std::{env, path::PathBuf};

use thiserror::Error;

use super::schema::Settings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then applies environment
/// variables (prefix `BENTO_PLAYER__`) on top, and falls back to struct
/// defaults for anything missing.
impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("BENTO_PLAYER")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let threshold = self.engine.restart_threshold_secs;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(SettingsError::Invalid {
                key: "engine.restart_threshold_secs",
                reason: format!("must be a non-negative number, got {threshold}"),
            });
        }
        if self.engine.tick_ms == 0 {
            return Err(SettingsError::Invalid {
                key: "engine.tick_ms",
                reason: "must be >= 1".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.audio.volume) {
            return Err(SettingsError::Invalid {
                key: "audio.volume",
                reason: format!("must be within 0.0..=2.0, got {}", self.audio.volume),
            });
        }
        Ok(())
    }
}

/// Resolve the config path from `BENTO_PLAYER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BENTO_PLAYER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/bento-player/config.toml`, or
/// `~/.config/bento-player/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = match env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) => Some(PathBuf::from(xdg)),
        None => env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")),
    };

    config_home.map(|d| d.join("bento-player").join("config.toml"))
}

/// `$XDG_STATE_HOME/bento-player/bento-player.log`, or
/// `~/.local/state/bento-player/bento-player.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = match env::var_os("XDG_STATE_HOME") {
        Some(xdg) => Some(PathBuf::from(xdg)),
        None => env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state")),
    };

    state_home.map(|d| d.join("bento-player").join("bento-player.log"))
}
