use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::CatalogSettings;

use super::error::CatalogError;
use super::model::{Catalog, TrackDescriptor};
use super::scan::scan;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<TrackDescriptor>,
}

impl Catalog {
    /// Parse a catalog from TOML text made of `[[tracks]]` tables.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Catalog::new(file.tracks)
    }

    /// Load a catalog file. Relative `audio_src` and `album_cover_url`
    /// entries resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file: CatalogFile = toml::from_str(&text)?;

        if let Some(base) = path.parent() {
            for track in &mut file.tracks {
                track.audio_src = resolve_relative(base, &track.audio_src);
                if !track.album_cover_url.is_empty() {
                    track.album_cover_url = resolve_relative(base, &track.album_cover_url);
                }
            }
        }

        Catalog::new(file.tracks)
    }
}

/// Open `path` as a catalog file when it is a file, or scan it as a music
/// directory otherwise.
pub fn open(path: &Path, settings: &CatalogSettings) -> Result<Catalog, CatalogError> {
    if path.is_file() {
        Catalog::load(path)
    } else {
        Catalog::new(scan(path, settings))
    }
}

pub(super) fn resolve_relative(base: &Path, src: &str) -> String {
    if src.contains("://") || Path::new(src).is_absolute() || base.as_os_str().is_empty() {
        return src.to_string();
    }
    base.join(src).display().to_string()
}
