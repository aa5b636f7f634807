//! Catalog model types: `TrackDescriptor`, `PreloadHint` and `Catalog`.

use serde::Deserialize;

use super::error::CatalogError;

/// How eagerly a track should be warmed ahead of playback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreloadHint {
    /// Never warm this track speculatively.
    None,
    /// Fetch metadata only.
    #[default]
    Metadata,
    /// Fetch the whole resource.
    Auto,
}

/// A single playable entry of the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Cover art reference, handed to the renderer as-is.
    #[serde(default, alias = "albumCoverUrl")]
    pub album_cover_url: String,
    /// Location of the audio resource (path, `file://` or remote URI).
    #[serde(alias = "audioSrc")]
    pub audio_src: String,
    /// Outbound link to the track's canonical listening page.
    #[serde(default, alias = "audioLink")]
    pub audio_link: Option<String>,
    #[serde(default, alias = "preload")]
    pub preload_hint: PreloadHint,
}

impl TrackDescriptor {
    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}

/// Non-empty, fixed-order sequence of tracks.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<TrackDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty track list.
    pub fn new(tracks: Vec<TrackDescriptor>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { tracks })
    }

    /// Number of tracks; always at least one.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    /// Track at `index` wrapped into range.
    pub fn track(&self, index: usize) -> &TrackDescriptor {
        &self.tracks[index % self.tracks.len()]
    }

    /// Index after `index`, wrapping to 0 past the end.
    pub fn next_index(&self, index: usize) -> usize {
        (index % self.len() + 1) % self.len()
    }

    /// Index before `index`, wrapping to the last entry from 0.
    pub fn prev_index(&self, index: usize) -> usize {
        let len = self.len();
        (index % len + len - 1) % len
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.tracks.iter()
    }
}
