use std::fs;

use crate::engine::ResourceError;
use crate::preload::{MetadataProbe, PreloadDepth};

use super::sink::source_path;

/// Warms local files: reads tags for a metadata preload, and the whole file
/// first for a full one so the OS cache holds it when playback starts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProbe;

impl MetadataProbe for LocalProbe {
    fn warm(&self, src: &str, depth: PreloadDepth) -> Result<(), ResourceError> {
        let path = source_path(src)?;

        if depth == PreloadDepth::Full {
            fs::read(&path).map_err(|source| ResourceError::Open {
                src: src.to_string(),
                source,
            })?;
        }

        lofty::read_from_path(&path)
            .map(|_| ())
            .map_err(|e| ResourceError::Decode {
                src: src.to_string(),
                reason: e.to_string(),
            })
    }
}
