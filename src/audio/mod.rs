//! Audio collaborators driven by the timer.
//!
//! The timer core only issues commands through [`LoopAudioPlayer`] and
//! [`OneShotAudioPlayer`]. Real output lives in `backend` (feature `audio`);
//! [`SilentPlayer`] stands in when no output is available and
//! [`RecordingPlayer`] captures commands for tests.

#[cfg(feature = "audio")]
pub mod backend;
pub mod dispatcher;
pub mod error;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::trace;

pub use dispatcher::AudioCueDispatcher;
pub use error::{AudioError, Result};

/// Continuously looping background track
pub trait LoopAudioPlayer {
    /// Resume from the current position; idempotent while playing
    fn play(&mut self);
    /// Hold the current position; idempotent while paused
    fn pause(&mut self);
    fn rewind(&mut self);
    /// `level` is in `[0.0, 1.0]`
    fn set_volume(&mut self, level: f32);
}

/// Single-shot cue with a volume fixed at construction
pub trait OneShotAudioPlayer {
    fn play(&mut self);
    fn rewind(&mut self);
}

impl<P: LoopAudioPlayer + ?Sized> LoopAudioPlayer for Box<P> {
    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn rewind(&mut self) {
        (**self).rewind()
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level)
    }
}

impl<P: OneShotAudioPlayer + ?Sized> OneShotAudioPlayer for Box<P> {
    fn play(&mut self) {
        (**self).play()
    }

    fn rewind(&mut self) {
        (**self).rewind()
    }
}

/// A command as seen by a player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play,
    Pause,
    Rewind,
    SetVolume(f32),
}

/// Player that produces no sound and only traces what it was asked to do
#[derive(Debug, Clone, Copy)]
pub struct SilentPlayer {
    name: &'static str,
}

impl SilentPlayer {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl LoopAudioPlayer for SilentPlayer {
    fn play(&mut self) {
        trace!(player = self.name, "play");
    }

    fn pause(&mut self) {
        trace!(player = self.name, "pause");
    }

    fn rewind(&mut self) {
        trace!(player = self.name, "rewind");
    }

    fn set_volume(&mut self, level: f32) {
        trace!(player = self.name, level, "set volume");
    }
}

impl OneShotAudioPlayer for SilentPlayer {
    fn play(&mut self) {
        trace!(player = self.name, "play");
    }

    fn rewind(&mut self) {
        trace!(player = self.name, "rewind");
    }
}

/// Test player that records every command.
///
/// Clones share one log, so a test can hand one clone to the timer and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    log: Rc<RefCell<Vec<AudioCommand>>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<AudioCommand> {
        self.log.borrow().clone()
    }

    pub fn count(&self, command: AudioCommand) -> usize {
        self.log.borrow().iter().filter(|c| **c == command).count()
    }

    pub fn last(&self) -> Option<AudioCommand> {
        self.log.borrow().last().copied()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, command: AudioCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl LoopAudioPlayer for RecordingPlayer {
    fn play(&mut self) {
        self.push(AudioCommand::Play);
    }

    fn pause(&mut self) {
        self.push(AudioCommand::Pause);
    }

    fn rewind(&mut self) {
        self.push(AudioCommand::Rewind);
    }

    fn set_volume(&mut self, level: f32) {
        self.push(AudioCommand::SetVolume(level));
    }
}

impl OneShotAudioPlayer for RecordingPlayer {
    fn play(&mut self) {
        self.push(AudioCommand::Play);
    }

    fn rewind(&mut self) {
        self.push(AudioCommand::Rewind);
    }
}

/// What the host wants from the audio output
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub background: Option<PathBuf>,
    pub cue: Option<PathBuf>,
    pub cue_volume: f32,
}

pub type BoxedLoop = Box<dyn LoopAudioPlayer>;
pub type BoxedOneShot = Box<dyn OneShotAudioPlayer>;

/// Open real players for the configured assets.
///
/// An asset that is not configured gets a [`SilentPlayer`]. Fails when the
/// crate was built without the `audio` feature and an asset was requested.
pub fn open_players(settings: &AudioSettings) -> Result<(BoxedLoop, BoxedOneShot)> {
    if settings.background.is_none() && settings.cue.is_none() {
        return Ok(silent_players());
    }
    open_backend(settings)
}

pub fn silent_players() -> (BoxedLoop, BoxedOneShot) {
    (
        Box::new(SilentPlayer::new("background")),
        Box::new(SilentPlayer::new("cue")),
    )
}

#[cfg(feature = "audio")]
fn open_backend(settings: &AudioSettings) -> Result<(BoxedLoop, BoxedOneShot)> {
    backend::open(settings)
}

#[cfg(not(feature = "audio"))]
fn open_backend(_settings: &AudioSettings) -> Result<(BoxedLoop, BoxedOneShot)> {
    Err(AudioError::Unavailable)
}
