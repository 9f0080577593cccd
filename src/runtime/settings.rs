use crate::config::Settings;

/// Load settings, falling back to defaults on any problem. Logging is not up
/// yet, so problems go to stderr.
pub fn load_settings() -> Settings {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });

    loaded.unwrap_or_else(|msg| {
        eprintln!("cdcase: {msg}, using defaults");
        Settings::default()
    })
}
