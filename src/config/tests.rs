use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_hydrophone_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("HYDROPHONE_CONFIG_PATH", "/tmp/hydrophone-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/hydrophone-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("hydrophone")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("hydrophone")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_inline_player() {
    let s = Settings::default();
    assert_eq!(s.player.waveform_bars, 120);
    assert_eq!(s.player.skip_seconds, 15);
    assert_eq!(s.player.route, PlayRouteSetting::Widget);
    assert_eq!(s.ui.records_per_page, 5);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_route_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
waveform_bars = 64
bar_min_height = 2.0
bar_max_height = 8.0
skip_seconds = 10
route = "fallback"

[network]
timeout_secs = 3

[ui]
header_text = "hello"
records_per_page = 8

[catalog]
file = "/srv/recordings.toml"
extensions = ["wav"]
recursive = false

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HYDROPHONE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("HYDROPHONE__PLAYER__SKIP_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.waveform_bars, 64);
    assert_eq!(s.player.bar_min_height, 2.0);
    assert_eq!(s.player.bar_max_height, 8.0);
    assert_eq!(s.player.skip_seconds, 10);
    assert_eq!(s.player.route, PlayRouteSetting::Direct);
    assert_eq!(s.network.timeout_secs, 3);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.records_per_page, 8);
    assert_eq!(
        s.catalog.file.as_deref(),
        Some(std::path::Path::new("/srv/recordings.toml"))
    );
    assert_eq!(s.catalog.extensions, vec!["wav".to_string()]);
    assert!(!s.catalog.recursive);
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
skip_seconds = 15
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HYDROPHONE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("HYDROPHONE__PLAYER__SKIP_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.skip_seconds, 30);
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut s = Settings::default();
    s.player.waveform_bars = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.bar_min_height = 60.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.records_per_page = 0;
    assert!(s.validate().is_err());
}
