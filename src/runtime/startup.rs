use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use bento_player::audio::{LocalProbe, RodioResource};
use bento_player::bridge::MorphIcon;
use bento_player::catalog;
use bento_player::config::Settings;
use bento_player::engine::PlaybackEngine;
use bento_player::preload::PreloadManager;

use crate::app::App;

/// Catalog location: command line, then config, then the working directory.
pub fn catalog_path(arg: Option<String>, settings: &Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.catalog.path.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load the catalog and wire the engine to the rodio backend.
pub fn build_app(
    path: PathBuf,
    settings: &Settings,
) -> Result<App<RodioResource>, Box<dyn Error>> {
    let catalog = catalog::open(&path, &settings.catalog)?;
    info!(path = %path.display(), tracks = catalog.len(), "catalog loaded");

    let resource = RodioResource::new(settings.audio.clone(), settings.engine.time_update());
    let preload = if settings.preload.enabled {
        PreloadManager::new(Arc::new(LocalProbe), settings.preload.options())
    } else {
        PreloadManager::disabled()
    };

    let engine = PlaybackEngine::new(
        catalog,
        resource,
        MorphIcon::new(),
        preload,
        settings.engine.options(),
    );

    Ok(App::new(engine, path.display().to_string()))
}
