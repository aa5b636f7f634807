//! Opening sources into paused `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::engine::ResourceError;

/// A freshly opened source, paused at its start position.
pub(super) struct Opened {
    pub sink: Sink,
    pub path: PathBuf,
    pub duration: Option<Duration>,
}

/// Map an `audio_src` to a local path. Plain paths and `file://` URIs are
/// accepted; any other scheme is unsupported by this backend.
pub fn source_path(src: &str) -> Result<PathBuf, ResourceError> {
    if let Some(rest) = src.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if src.contains("://") || src.trim().is_empty() {
        return Err(ResourceError::UnsupportedSource(src.to_string()));
    }
    Ok(PathBuf::from(src))
}

pub(super) fn open_source(
    stream: &OutputStream,
    src: &str,
    volume: f32,
) -> Result<Opened, ResourceError> {
    let path = source_path(src)?;
    create_sink_at(stream, &path, Duration::ZERO, volume)
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Opened, ResourceError> {
    let file = File::open(path).map_err(|source| ResourceError::Open {
        src: path.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| ResourceError::Decode {
        src: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let duration = decoder.total_duration().or_else(|| tagged_duration(path));

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.pause();
    // `skip_duration` doubles as the seek fallback; Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));

    Ok(Opened {
        sink,
        path: path.to_path_buf(),
        duration,
    })
}

/// Duration from the file's tags, for decoders that cannot tell.
pub(super) fn tagged_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
