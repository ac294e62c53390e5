use tracing::{info, warn};

use interlude::config;

/// Settings for this run. A missing, unreadable or invalid config never
/// stops the player; it falls back to defaults.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!(error = %msg, "invalid config, using defaults");
                config::Settings::default()
            } else {
                info!(path = ?config::resolve_config_path(), "settings loaded");
                s
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            config::Settings::default()
        }
    }
}
