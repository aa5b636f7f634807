use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::engine::{AudioResource, EventSink, ResourceError, SwapId};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, ResourceHandle, ResourceInfo};

/// Audio resource playing local files through the default output device.
pub struct RodioResource {
    tx: Sender<AudioCmd>,
    info: ResourceHandle,
    pending: Option<(String, SwapId)>,
    fade_out: Duration,
    join: Option<JoinHandle<()>>,
}

impl RodioResource {
    /// Spawn the output worker. `time_update` is the interval between
    /// position reports while playing.
    pub fn new(settings: AudioSettings, time_update: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let info: ResourceHandle = Arc::new(Mutex::new(ResourceInfo::default()));
        let fade_out = Duration::from_millis(settings.quit_fade_out_ms);

        let join = spawn_audio_thread(rx, info.clone(), settings, time_update);

        Self {
            tx,
            info,
            pending: None,
            fade_out,
            join: Some(join),
        }
    }

    pub fn info(&self) -> ResourceInfo {
        self.info.lock().map(|i| i.clone()).unwrap_or_default()
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), ResourceError> {
        self.tx.send(cmd).map_err(|_| ResourceError::Disconnected)
    }
}

impl AudioResource for RodioResource {
    fn subscribe(&mut self, events: EventSink) {
        let _ = self.send(AudioCmd::Subscribe(events));
    }

    fn set_source(&mut self, src: &str, swap: SwapId) {
        self.pending = Some((src.to_string(), swap));
    }

    fn load(&mut self) {
        if let Some((src, swap)) = self.pending.take() {
            let _ = self.send(AudioCmd::Load { src, swap });
        }
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn position(&self) -> f64 {
        self.info().position
    }

    fn set_position(&mut self, seconds: f64) {
        if self.send(AudioCmd::Seek(seconds)).is_ok() {
            if let Ok(mut info) = self.info.lock() {
                info.position = seconds;
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        self.info().duration
    }

    /// Fade out, stop the worker and wait for it to exit.
    fn release(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: self.fade_out.as_millis() as u64,
        });
        let _ = join.join();
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.release();
    }
}
