use std::path::Path;

use lofty::prelude::{Accessor, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::CatalogSettings;

use super::model::{PreloadHint, TrackDescriptor};

const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Cover art sitting next to the audio file, if any.
fn find_cover(path: &Path) -> Option<String> {
    let dir = path.parent()?;
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .map(|p| p.display().to_string())
}

fn describe(path: &Path) -> TrackDescriptor {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = String::new();

    if let Ok(tagged) = lofty::read_from_path(path) {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                title = v.trim().to_string();
            }
            if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                artist = v.trim().to_string();
            }
        }
    }

    TrackDescriptor {
        title,
        artist,
        album_cover_url: find_cover(path).unwrap_or_default(),
        audio_src: path.display().to_string(),
        audio_link: None,
        preload_hint: PreloadHint::Metadata,
    }
}

/// Walk `dir` and describe every audio file found, sorted by "artist - title".
pub fn scan(dir: &Path, settings: &CatalogSettings) -> Vec<TrackDescriptor> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<TrackDescriptor> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| describe(e.path()))
        .collect();

    tracks.sort_by_key(|t| t.display().to_lowercase());
    tracks
}
