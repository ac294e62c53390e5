use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `INTERLUDE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("INTERLUDE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.scheduler.tick_rate_hz == 0 {
            return Err("scheduler.tick_rate_hz must be >= 1".to_string());
        }
        if self.scheduler.min_ticks_before_check == 0 {
            return Err("scheduler.min_ticks_before_check must be >= 1".to_string());
        }
        for (key, gain) in [("mixer.music", self.mixer.music), ("mixer.master", self.mixer.master)] {
            if !(0.0..=1.0).contains(&gain) {
                return Err(format!("{key} must be within 0.0..=1.0"));
            }
        }
        Ok(())
    }
}

/// Resolve the config path from `INTERLUDE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("INTERLUDE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/interlude/config.toml`
/// or `~/.config/interlude/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("interlude").join("config.toml"))
}

/// Data directory for music and playlists: `$XDG_DATA_HOME/interlude`,
/// `~/.local/share/interlude`, or `./interlude` when neither is set.
pub fn default_data_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("interlude");
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("interlude");
    }
    PathBuf::from("interlude")
}
