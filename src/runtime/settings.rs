use crate::config;

/// Load settings, falling back to defaults. Logging isn't up yet, so problems
/// go to stderr before the terminal is taken over.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("turntable: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("turntable: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
