use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Artist shown for files without an artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build a `Track` for `path`, probing tags and duration.
///
/// Probing failures are not errors: the title falls back to the file stem,
/// the artist to [`UNKNOWN_ARTIST`] and the duration to 0 (unknown).
pub fn read_track(path: &Path) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut duration_secs = 0;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration_secs = tagged.properties().duration().as_secs();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title() {
                    let v = v.trim();
                    if !v.is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.artist() {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = v.to_string();
                    }
                }
            }
        }
        Err(e) => warn!(path = %path.display(), error = %e, "failed to read metadata"),
    }

    Track {
        file: path.display().to_string(),
        title,
        artist,
        cover: None,
        duration_secs,
    }
}

pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            tracks.push(read_track(path));
        }
    }

    tracks.sort_by(|a, b| a.file.to_lowercase().cmp(&b.file.to_lowercase()));
    debug!(dir = %dir.display(), count = tracks.len(), "library scanned");
    tracks
}
