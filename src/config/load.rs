use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment
/// variables (prefix `HYDROPHONE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("HYDROPHONE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.player.waveform_bars == 0 {
            return Err("player.waveform_bars must be >= 1".to_string());
        }
        if !(self.player.bar_min_height <= self.player.bar_max_height) {
            return Err("player.bar_min_height must not exceed player.bar_max_height".to_string());
        }
        if self.player.tick_ms == 0 {
            return Err("player.tick_ms must be >= 1".to_string());
        }
        if self.ui.records_per_page == 0 {
            return Err("ui.records_per_page must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `HYDROPHONE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("HYDROPHONE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/hydrophone/config.toml`
/// or `~/.config/hydrophone/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("hydrophone").join("config.toml"))
}
