use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `CDCASE__`) override it, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CDCASE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.crossfade_steps == 0 {
            return Err("audio.crossfade_steps must be >= 1".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must list at least one extension".to_string());
        }
        Ok(())
    }

    /// Store file location: configured path or the XDG data default.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .path
            .clone()
            .or_else(|| xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("sources.toml")))
    }

    /// Log file location: configured path or the XDG state default.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .file
            .clone()
            .or_else(|| xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("cdcase.log")))
    }
}

/// Resolve the config path from `CDCASE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CDCASE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cdcase/config.toml`
/// or `~/.config/cdcase/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("config.toml"))
}

/// `$<var>/cdcase`, or `~/<home_fallback>/cdcase`.
fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    let base = if let Some(xdg) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    };

    base.map(|d| d.join("cdcase"))
}
