use super::*;
use bento_player::catalog::PreloadHint;
use std::sync::mpsc;

fn make_track() -> TrackDescriptor {
    TrackDescriptor {
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album_cover_url: "/tmp/music/cover.jpg".to_string(),
        audio_src: "/tmp/music/test.mp3".to_string(),
        audio_link: None,
        preload_hint: PreloadHint::Metadata,
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    (
        MprisHandle {
            state: state.clone(),
        },
        state,
    )
}

#[test]
fn set_track_fills_shared_state() {
    let (handle, state) = handle();
    handle.set_track(7, &make_track(), Some(1.234567));

    let s = state.lock().unwrap();
    assert_eq!(s.title.as_deref(), Some("Test Title"));
    assert_eq!(s.artist, vec!["Test Artist".to_string()]);
    assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
    assert_eq!(s.art_url.as_deref(), Some("file:///tmp/music/cover.jpg"));
    assert_eq!(s.length_micros, Some(1_234_567));
    assert_eq!(
        s.track_id.as_deref(),
        Some("/org/mpris/MediaPlayer2/track/7")
    );
}

#[test]
fn set_track_drops_blank_and_unknown_fields() {
    let (handle, state) = handle();
    let mut track = make_track();
    track.artist = "  ".into();
    track.album_cover_url = String::new();
    track.audio_src = "https://cdn.example.com/a.mp3".into();
    handle.set_track(0, &track, None);

    let s = state.lock().unwrap();
    assert!(s.artist.is_empty());
    assert_eq!(s.art_url, None);
    assert_eq!(s.url.as_deref(), Some("https://cdn.example.com/a.mp3"));
    assert_eq!(s.length_micros, None);
}

#[test]
fn playback_status_follows_playing_flag() {
    let (handle, state) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert_eq!(iface.playback_status(), "Paused");
    handle.set_playback(true);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playback(false);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };
    handle.set_track(1, &make_track(), Some(42.0));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn seek_converts_microseconds_to_seconds() {
    let (_handle, state) = handle();
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.seek(-2_500_000);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::SeekBy(-2.5));
}
