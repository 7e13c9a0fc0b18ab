use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then overlays environment
/// variables (prefix `TURNTABLE__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TURNTABLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.initial_volume > 100 {
            return Err("audio.initial_volume must be <= 100".to_string());
        }
        if self.ui.visualizer_bars == 0 {
            return Err("ui.visualizer_bars must be >= 1".to_string());
        }
        if self.ui.animation_tick_ms == 0 {
            return Err("ui.animation_tick_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TURNTABLE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TURNTABLE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/turntable/config.toml`
/// or `~/.config/turntable/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("turntable").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/turntable/turntable.log`
/// or `~/.local/state/turntable/turntable.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"])
        .map(|d| d.join("turntable").join("turntable.log"))
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        return Some(PathBuf::from(xdg));
    }
    env::var_os("HOME").map(|home| {
        home_fallback
            .iter()
            .fold(PathBuf::from(home), |p, part| p.join(part))
    })
}
