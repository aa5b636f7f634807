use bento_player::config::{Settings, SettingsError};

/// Load settings, falling back to defaults when the file is unreadable or
/// invalid. The error is handed back so it can be logged once logging is up.
pub fn load_settings() -> (Settings, Option<SettingsError>) {
    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (Settings::default(), Some(e)),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (Settings::default(), Some(e)),
    }
}
