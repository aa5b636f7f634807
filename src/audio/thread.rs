use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::engine::{EventSink, ResourceError, ResourceEvent, SwapId};

use super::sink::{create_sink_at, open_source};
use super::types::{AudioCmd, ResourceHandle};

/// The sink currently bound to the output.
struct Current {
    swap: SwapId,
    path: PathBuf,
    sink: Sink,
    /// Position the sink started from when it was rebuilt for a seek;
    /// `Sink::get_pos` counts from there.
    offset: Duration,
    playing: bool,
    ended: bool,
}

impl Current {
    fn position(&self) -> f64 {
        (self.offset + self.sink.get_pos()).as_secs_f64()
    }
}

struct Worker {
    stream: Option<OutputStream>,
    info: ResourceHandle,
    settings: AudioSettings,
    events: Option<EventSink>,
    current: Option<Current>,
    last_swap: SwapId,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    info: ResourceHandle,
    settings: AudioSettings,
    time_update: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(err) => {
                error!(%err, "no audio output device");
                None
            }
        };

        let mut worker = Worker {
            stream,
            info,
            settings,
            events: None,
            current: None,
            last_swap: SwapId::default(),
        };
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(time_update) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    worker.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => worker.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= time_update {
                last_tick = Instant::now();
                worker.tick();
            }
        }
    })
}

impl Worker {
    fn emit(&self, swap: SwapId, event: ResourceEvent) {
        if let Some(events) = &self.events {
            events.emit(swap, event);
        }
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Subscribe(events) => self.events = Some(events),
            AudioCmd::Load { src, swap } => self.load(&src, swap),
            AudioCmd::Play => self.play(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(secs) => self.seek(secs),
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn load(&mut self, src: &str, swap: SwapId) {
        if let Some(old) = self.current.take() {
            old.sink.stop();
        }
        self.last_swap = swap;
        if let Ok(mut info) = self.info.lock() {
            info.swap = swap;
            info.position = 0.0;
            info.duration = None;
            info.playing = false;
        }

        let opened = match self.stream.as_ref() {
            Some(stream) => open_source(stream, src, self.settings.volume),
            None => Err(ResourceError::OutputUnavailable(
                "no audio output device".into(),
            )),
        };

        match opened {
            Ok(opened) => {
                let duration = opened.duration.map(|d| d.as_secs_f64());
                if let Ok(mut info) = self.info.lock() {
                    info.duration = duration;
                }
                debug!(%src, ?duration, "source opened");
                self.current = Some(Current {
                    swap,
                    path: opened.path,
                    sink: opened.sink,
                    offset: Duration::ZERO,
                    playing: false,
                    ended: false,
                });
                self.emit(swap, ResourceEvent::MetadataLoaded { duration });
                self.emit(swap, ResourceEvent::CanPlay);
            }
            Err(err) => {
                warn!(%src, %err, "failed to open source");
                self.emit(
                    swap,
                    ResourceEvent::LoadFailed {
                        reason: err.to_string(),
                    },
                );
            }
        }
    }

    fn play(&mut self) {
        let Some(current) = self.current.as_mut() else {
            self.emit(
                self.last_swap,
                ResourceEvent::PlayRejected {
                    reason: "no playable source".into(),
                },
            );
            return;
        };

        if current.ended {
            // Finished sinks are empty; reopen from the start.
            let Some(stream) = self.stream.as_ref() else {
                return;
            };
            match create_sink_at(stream, &current.path, Duration::ZERO, self.settings.volume) {
                Ok(opened) => {
                    current.sink = opened.sink;
                    current.offset = Duration::ZERO;
                    current.ended = false;
                }
                Err(err) => {
                    let swap = current.swap;
                    self.emit(
                        swap,
                        ResourceEvent::PlayRejected {
                            reason: err.to_string(),
                        },
                    );
                    return;
                }
            }
        }

        current.sink.play();
        current.playing = true;
        if let Ok(mut info) = self.info.lock() {
            info.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.sink.pause();
            current.playing = false;
            if let Ok(mut info) = self.info.lock() {
                info.playing = false;
                info.position = current.position();
            }
        }
    }

    fn seek(&mut self, secs: f64) {
        let Ok(target) = Duration::try_from_secs_f64(secs.max(0.0)) else {
            return;
        };
        let Some(current) = self.current.as_mut() else {
            return;
        };

        if current.sink.try_seek(target).is_ok() {
            current.offset = Duration::ZERO;
        } else {
            // Not every decoder can seek; rebuild the sink and skip into the
            // file instead.
            let Some(stream) = self.stream.as_ref() else {
                return;
            };
            match create_sink_at(stream, &current.path, target, self.settings.volume) {
                Ok(opened) => {
                    current.sink.stop();
                    if current.playing {
                        opened.sink.play();
                    }
                    current.sink = opened.sink;
                    current.offset = target;
                }
                Err(err) => {
                    warn!(%err, "seek failed");
                    return;
                }
            }
        }
        current.ended = false;

        let swap = current.swap;
        if let Ok(mut info) = self.info.lock() {
            info.position = secs;
        }
        self.emit(swap, ResourceEvent::TimeUpdate { position: secs });
    }

    /// Periodic position report and end-of-track detection.
    fn tick(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        if !current.playing || current.ended {
            return;
        }

        let swap = current.swap;
        if current.sink.empty() {
            current.ended = true;
            current.playing = false;
            if let Ok(mut info) = self.info.lock() {
                info.playing = false;
            }
            self.emit(swap, ResourceEvent::Ended);
            return;
        }

        let position = current.position();
        if let Ok(mut info) = self.info.lock() {
            info.position = position;
        }
        self.emit(swap, ResourceEvent::TimeUpdate { position });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(current) = self.current.take() {
            if current.playing {
                fade_out_sink(&current.sink, fade_out_ms, self.settings.volume);
            }
            current.sink.stop();
        }
        if let Ok(mut info) = self.info.lock() {
            info.playing = false;
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64, volume: f32) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
