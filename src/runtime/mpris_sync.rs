use bento_player::engine::AudioResource;

use crate::app::App;
use crate::mpris::MprisHandle;

/// What MPRIS last saw: track index, playing flag and duration.
pub type MprisView = (usize, bool, Option<f64>);

pub fn current_view<R: AudioResource>(app: &App<R>) -> MprisView {
    let state = app.engine.state();
    (state.current_track_index, state.is_playing, state.duration)
}

pub fn update_mpris<R: AudioResource>(mpris: &MprisHandle, app: &App<R>) {
    let state = app.engine.state();
    mpris.set_track(
        state.current_track_index,
        app.engine.current_track(),
        state.duration,
    );
    mpris.set_playback(state.is_playing);
}
