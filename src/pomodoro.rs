use std::time::Instant;

use crate::audio::{AudioCueDispatcher, LoopAudioPlayer, OneShotAudioPlayer};
use crate::clock::Clock;
use crate::controls::{derive_control_states, ControlStates};
use crate::session::{Phase, SessionController, SessionEvent, SessionKind, SessionState};
use crate::util::format_remaining;
use crate::volume::VolumeController;

/// Discrete user actions routed into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    /// Start when startable, otherwise stop
    Toggle,
    Reset,
    VolumeUp,
    VolumeDown,
}

/// Everything the UI needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub remaining: String,
    pub kind: SessionKind,
    pub phase: Phase,
    pub volume: f32,
    pub controls: ControlStates,
}

/// The timer as the host sees it: session, volume and audio wired together
pub struct Pomodoro<C: Clock, L, O> {
    session: SessionController<C>,
    volume: VolumeController,
    audio: AudioCueDispatcher<L, O>,
}

impl<C, L, O> Pomodoro<C, L, O>
where
    C: Clock,
    L: LoopAudioPlayer,
    O: OneShotAudioPlayer,
{
    /// Pushes the initial volume to the background player.
    pub fn new(clock: C, volume: VolumeController, background: L, cue: O) -> Self {
        let mut audio = AudioCueDispatcher::new(background, cue);
        audio.on_volume_changed(volume.level());
        Self {
            session: SessionController::new(clock),
            volume,
            audio,
        }
    }

    pub fn start(&mut self) {
        let event = self.session.start();
        self.dispatch(event);
    }

    pub fn stop(&mut self) {
        let event = self.session.stop();
        self.dispatch(event);
    }

    pub fn reset(&mut self) {
        let event = self.session.reset();
        self.dispatch(event);
    }

    pub fn volume_up(&mut self) {
        if self.volume.volume_up() {
            self.audio.on_volume_changed(self.volume.level());
        }
    }

    pub fn volume_down(&mut self) {
        if self.volume.volume_down() {
            self.audio.on_volume_changed(self.volume.level());
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let event = self.session.tick(now);
        self.dispatch(event);
    }

    /// Tick against the controller's own clock
    pub fn tick_now(&mut self) {
        let now = self.session.clock().now();
        self.tick(now);
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Start => self.start(),
            Action::Stop => self.stop(),
            Action::Toggle => {
                if self.control_states().start_enabled {
                    self.start()
                } else {
                    self.stop()
                }
            }
            Action::Reset => self.reset(),
            Action::VolumeUp => self.volume_up(),
            Action::VolumeDown => self.volume_down(),
        }
    }

    fn dispatch(&mut self, event: Option<SessionEvent>) {
        if let Some(event) = event {
            self.audio.on_session_event(event);
        }
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn remaining_formatted(&self) -> String {
        format_remaining(self.session.remaining())
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    pub fn current_kind(&self) -> SessionKind {
        self.session.kind()
    }

    pub fn volume_level(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_volume_at_min(&self) -> bool {
        self.volume.is_at_min()
    }

    pub fn is_volume_at_max(&self) -> bool {
        self.volume.is_at_max()
    }

    pub fn control_states(&self) -> ControlStates {
        derive_control_states(self.session.state(), &self.volume)
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            remaining: self.remaining_formatted(),
            kind: self.current_kind(),
            phase: self.session.phase(),
            volume: self.volume_level(),
            controls: self.control_states(),
        }
    }
}
