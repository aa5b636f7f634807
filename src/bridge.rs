//! Mirrors play state into a decorative play/pause animation.
//!
//! The engine only knows [`AnimationBridge`]; any animation backend that can
//! react to `set_playing` can be plugged in.

/// Capability set the engine drives after each play state change.
pub trait AnimationBridge {
    fn set_playing(&mut self, playing: bool);
}

impl<T: AnimationBridge + ?Sized> AnimationBridge for Box<T> {
    fn set_playing(&mut self, playing: bool) {
        (**self).set_playing(playing)
    }
}

/// Bridge for hosts without an animated icon.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBridge;

impl AnimationBridge for NoopBridge {
    fn set_playing(&mut self, _playing: bool) {}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Morphing from the "play" shape towards the "pause" shape.
    Forward,
    /// Morphing back towards the "play" shape.
    Reverse,
}

/// Frames morphing a play triangle into pause bars.
const MORPH_FRAMES: [&str; 4] = ["▶ ", "▶▏", "▌▎", "▌▌"];

/// Terminal play/pause icon that morphs between its two shapes.
///
/// `set_playing(true)` runs the morph forward (play -> pause shape, meaning
/// "now playing, press to pause"); `set_playing(false)` runs it in reverse.
/// The host calls [`advance`](MorphIcon::advance) once per frame.
#[derive(Debug, Clone)]
pub struct MorphIcon {
    frame: usize,
    direction: Direction,
    running: bool,
}

impl Default for MorphIcon {
    fn default() -> Self {
        Self {
            frame: 0,
            direction: Direction::Reverse,
            running: false,
        }
    }
}

impl MorphIcon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True while the morph has not reached the end for its direction.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn glyph(&self) -> &'static str {
        MORPH_FRAMES[self.frame]
    }

    /// Step one frame in the current direction, stopping at either end.
    pub fn advance(&mut self) {
        if !self.running {
            return;
        }
        match self.direction {
            Direction::Forward if self.frame + 1 < MORPH_FRAMES.len() => self.frame += 1,
            Direction::Reverse if self.frame > 0 => self.frame -= 1,
            _ => self.running = false,
        }
    }
}

impl AnimationBridge for MorphIcon {
    fn set_playing(&mut self, playing: bool) {
        self.direction = if playing {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.running = true;
    }
}
