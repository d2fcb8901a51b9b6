use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/hydrophone/config.toml` or `~/.config/hydrophone/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `HYDROPHONE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub network: NetworkSettings,
    pub ui: UiSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Number of decorative bars in the waveform strip.
    pub waveform_bars: usize,
    /// Lowest bar height (arbitrary units, scaled to the strip height).
    pub bar_min_height: f32,
    /// Highest bar height (arbitrary units, scaled to the strip height).
    pub bar_max_height: f32,
    /// Seconds skipped by the back/forward controls.
    pub skip_seconds: u64,
    /// How often the platform thread reports the playback position (milliseconds).
    pub tick_ms: u64,
    /// Where a play request from the recordings table goes.
    pub route: PlayRouteSetting,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            waveform_bars: 120,
            bar_min_height: 10.0,
            bar_max_height: 50.0,
            skip_seconds: 15,
            tick_ms: 200,
            route: PlayRouteSetting::Widget,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayRouteSetting {
    /// Open the inline player widget.
    #[serde(alias = "inline")]
    Widget,
    /// Play straight to the audio device without showing the widget.
    #[serde(alias = "fallback", alias = "headless")]
    Direct,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-request timeout for remote clips (seconds).
    pub timeout_secs: u64,
    /// Largest remote clip we are willing to buffer (bytes).
    pub max_bytes: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top banner box.
    pub header_text: String,
    /// Rows shown per page of the recordings table.
    pub records_per_page: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " Search Vessel Noise Data ".to_string(),
            records_per_page: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Optional TOML catalog of recordings (`[[recording]]` tables).
    pub file: Option<PathBuf>,
    /// File extensions to treat as recordings when scanning (case-insensitive, without dot).
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
            file: None,
            extensions: vec!["wav".into(), "flac".into(), "mp3".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file; the terminal belongs to the UI so nothing is written to stderr.
    pub file: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: std::env::temp_dir().join("hydrophone.log"),
            level: "info".to_string(),
        }
    }
}
