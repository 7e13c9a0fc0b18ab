use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{self, LogSettings};

fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(config::default_log_path)
}

/// `RUST_LOG` wins over the configured filter.
fn env_filter(settings: &LogSettings) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), &settings.filter)
}

/// First directive string that parses, falling back to `info`.
fn filter_from(env: Option<&str>, configured: &str) -> EnvFilter {
    env.and_then(|e| EnvFilter::try_new(e).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Send `tracing` output to the log file. The terminal belongs to the UI, so
/// nothing is written to stdout/stderr. Returns the file in use, or an error
/// when the file can't be opened or a subscriber is already installed.
pub fn init(settings: &LogSettings) -> io::Result<Option<PathBuf>> {
    if !settings.enabled {
        return Ok(None);
    }
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };
    let file = open_log_file(&path)?;

    tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(Some(path))
}
