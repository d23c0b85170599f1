use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::Clock;

pub const WORK_DURATION: Duration = Duration::from_secs(25 * 60);
pub const BREAK_DURATION: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    /// Fixed length of a session of this kind
    pub fn duration(self) -> Duration {
        match self {
            SessionKind::Work => WORK_DURATION,
            SessionKind::Break => BREAK_DURATION,
        }
    }

    /// The kind that follows this one on completion
    pub fn next(self) -> Self {
        match self {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Stopped,
    Running,
    Paused,
}

/// Transitions reported to the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started(SessionKind),
    Paused,
    Reset,
    /// Carries the kind that just finished; the next kind is `kind.next()`.
    Completed(SessionKind),
}

/// Timer state as a plain value.
///
/// While running, `remaining = nominal - (banked + (now - anchor))`, where
/// `banked` is the time already spent in this session before the current
/// anchor. Resuming from a pause banks the elapsed time and re-anchors at the
/// resume instant, so no time is lost or gained across a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub kind: SessionKind,
    pub nominal: Duration,
    pub remaining: Duration,
    pub phase: Phase,
    anchor: Option<Instant>,
    banked: Duration,
}

/// Result of a transition: the next state and what (if anything) happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: SessionState,
    pub event: Option<SessionEvent>,
}

impl Step {
    fn quiet(state: SessionState) -> Self {
        Self { state, event: None }
    }

    fn with(state: SessionState, event: SessionEvent) -> Self {
        Self {
            state,
            event: Some(event),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::fresh(SessionKind::Work, Phase::Stopped, None)
    }
}

impl SessionState {
    fn fresh(kind: SessionKind, phase: Phase, anchor: Option<Instant>) -> Self {
        Self {
            kind,
            nominal: kind.duration(),
            remaining: kind.duration(),
            phase,
            anchor,
            banked: Duration::ZERO,
        }
    }

    /// Instant elapsed time is measured from; only set while running
    pub fn anchor(&self) -> Option<Instant> {
        self.anchor
    }

    pub fn elapsed(&self) -> Duration {
        self.nominal.saturating_sub(self.remaining)
    }

    pub fn start(self, now: Instant) -> Step {
        match self.phase {
            Phase::Running => Step::quiet(self),
            Phase::Paused => Step::with(
                Self {
                    phase: Phase::Running,
                    anchor: Some(now),
                    banked: self.elapsed(),
                    ..self
                },
                SessionEvent::Started(self.kind),
            ),
            Phase::Stopped => Step::with(
                Self {
                    phase: Phase::Running,
                    anchor: Some(now),
                    banked: Duration::ZERO,
                    ..self
                },
                SessionEvent::Started(self.kind),
            ),
        }
    }

    pub fn stop(self) -> Step {
        if self.phase != Phase::Running {
            return Step::quiet(self);
        }
        Step::with(
            Self {
                phase: Phase::Paused,
                anchor: None,
                ..self
            },
            SessionEvent::Paused,
        )
    }

    pub fn reset(self) -> Step {
        Step::with(Self::default(), SessionEvent::Reset)
    }

    /// Advances by at most one session boundary.
    pub fn tick(self, now: Instant) -> Step {
        let anchor = match (self.phase, self.anchor) {
            (Phase::Running, Some(anchor)) => anchor,
            _ => return Step::quiet(self),
        };

        let elapsed = self.banked + now.saturating_duration_since(anchor);
        match self.nominal.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => Step::quiet(Self { remaining, ..self }),
            _ => {
                let next = self.kind.next();
                Step::with(
                    Self::fresh(next, Phase::Running, Some(now)),
                    SessionEvent::Completed(self.kind),
                )
            }
        }
    }
}

/// Owns the session state and the clock used to anchor user actions
#[derive(Debug)]
pub struct SessionController<C: Clock> {
    clock: C,
    state: SessionState,
}

impl<C: Clock> SessionController<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn kind(&self) -> SessionKind {
        self.state.kind
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining(&self) -> Duration {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == Phase::Paused
    }

    pub fn start(&mut self) -> Option<SessionEvent> {
        let now = self.clock.now();
        self.apply(self.state.start(now))
    }

    pub fn stop(&mut self) -> Option<SessionEvent> {
        self.apply(self.state.stop())
    }

    pub fn reset(&mut self) -> Option<SessionEvent> {
        self.apply(self.state.reset())
    }

    pub fn tick(&mut self, now: Instant) -> Option<SessionEvent> {
        self.apply(self.state.tick(now))
    }

    fn apply(&mut self, step: Step) -> Option<SessionEvent> {
        self.state = step.state;
        match step.event {
            Some(SessionEvent::Completed(finished)) => info!(
                finished = %finished,
                next = %self.state.kind,
                "session completed"
            ),
            Some(event) => debug!(
                ?event,
                kind = %self.state.kind,
                phase = %self.state.phase,
                remaining_secs = self.state.remaining.as_secs(),
                "session transition"
            ),
            None => {}
        }
        step.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const MIN: Duration = Duration::from_secs(60);

    fn controller() -> (SessionController<ManualClock>, ManualClock, Instant) {
        let t0 = Instant::now();
        let clock = ManualClock::new(t0);
        (SessionController::new(clock.clone()), clock, t0)
    }

    #[test]
    fn starts_stopped_in_work() {
        let state = SessionState::default();
        assert_eq!(state.kind, SessionKind::Work);
        assert_eq!(state.nominal, 25 * MIN);
        assert_eq!(state.remaining, 25 * MIN);
        assert_eq!(state.phase, Phase::Stopped);
        assert_eq!(state.anchor(), None);
    }

    #[test]
    fn kind_alternates() {
        assert_eq!(SessionKind::Work.next(), SessionKind::Break);
        assert_eq!(SessionKind::Break.next(), SessionKind::Work);
        assert_eq!(SessionKind::Break.duration(), 5 * MIN);
    }

    #[test]
    fn start_from_stopped_anchors_now() {
        let (mut ctl, _clock, t0) = controller();
        assert_eq!(ctl.start(), Some(SessionEvent::Started(SessionKind::Work)));
        assert!(ctl.is_running());
        assert_eq!(ctl.state().anchor(), Some(t0));
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut ctl, clock, t0) = controller();
        ctl.start();
        clock.advance(MIN);
        assert_eq!(ctl.start(), None);
        assert_eq!(ctl.state().anchor(), Some(t0));
    }

    #[test]
    fn tick_counts_down() {
        let (mut ctl, _clock, t0) = controller();
        ctl.start();
        assert_eq!(ctl.tick(t0 + 90 * Duration::from_secs(1)), None);
        assert_eq!(ctl.remaining(), 25 * MIN - Duration::from_secs(90));
    }

    #[test]
    fn tick_is_ignored_unless_running() {
        let (mut ctl, _clock, t0) = controller();
        assert_eq!(ctl.tick(t0 + 10 * MIN), None);
        assert_eq!(ctl.remaining(), 25 * MIN);
    }

    #[test]
    fn pause_resume_keeps_continuity() {
        let (mut ctl, clock, t0) = controller();
        ctl.start();
        ctl.tick(t0 + 10 * MIN);
        assert_eq!(ctl.remaining(), 15 * MIN);

        assert_eq!(ctl.stop(), Some(SessionEvent::Paused));
        assert!(ctl.is_paused());

        clock.set(t0 + 12 * MIN);
        ctl.tick(t0 + 12 * MIN);
        assert_eq!(ctl.remaining(), 15 * MIN, "paused time must not count");

        assert_eq!(ctl.start(), Some(SessionEvent::Started(SessionKind::Work)));
        ctl.tick(t0 + 17 * MIN);
        assert_eq!(ctl.remaining(), 10 * MIN);
    }

    #[test]
    fn stop_is_noop_unless_running() {
        let (mut ctl, _clock, _t0) = controller();
        assert_eq!(ctl.stop(), None);
        assert_eq!(ctl.phase(), Phase::Stopped);

        ctl.start();
        ctl.stop();
        assert_eq!(ctl.stop(), None);
        assert_eq!(ctl.phase(), Phase::Paused);
    }

    #[test]
    fn completion_switches_kind_and_keeps_running() {
        let (mut ctl, _clock, t0) = controller();
        ctl.start();

        let done = t0 + 25 * MIN;
        assert_eq!(
            ctl.tick(done),
            Some(SessionEvent::Completed(SessionKind::Work))
        );
        assert_eq!(ctl.kind(), SessionKind::Break);
        assert_eq!(ctl.state().nominal, 5 * MIN);
        assert_eq!(ctl.remaining(), 5 * MIN);
        assert!(ctl.is_running());
        assert_eq!(ctl.state().anchor(), Some(done));

        assert_eq!(
            ctl.tick(done + 5 * MIN),
            Some(SessionEvent::Completed(SessionKind::Break))
        );
        assert_eq!(ctl.kind(), SessionKind::Work);
        assert_eq!(ctl.remaining(), 25 * MIN);
    }

    #[test]
    fn one_boundary_per_tick() {
        let (mut ctl, _clock, t0) = controller();
        ctl.start();
        // Far past both the work and the following break
        let late = t0 + 60 * MIN;
        assert_eq!(
            ctl.tick(late),
            Some(SessionEvent::Completed(SessionKind::Work))
        );
        assert_eq!(ctl.kind(), SessionKind::Break);
        assert_eq!(ctl.remaining(), 5 * MIN);
    }

    #[test]
    fn reset_from_any_state() {
        let (mut ctl, clock, t0) = controller();
        ctl.start();
        ctl.tick(t0 + 25 * MIN);
        clock.set(t0 + 27 * MIN);
        ctl.stop();

        assert_eq!(ctl.reset(), Some(SessionEvent::Reset));
        assert_eq!(*ctl.state(), SessionState::default());

        assert_eq!(ctl.reset(), Some(SessionEvent::Reset));
        assert_eq!(*ctl.state(), SessionState::default());
    }

    #[test]
    fn remaining_stays_within_nominal() {
        let (mut ctl, clock, t0) = controller();
        ctl.start();
        for secs in (0..3_600u64).step_by(7) {
            let now = t0 + Duration::from_secs(secs);
            clock.set(now);
            ctl.tick(now);
            let state = ctl.state();
            assert!(state.remaining <= state.nominal);
            if secs % 700 == 0 {
                ctl.stop();
                ctl.start();
            }
        }
    }

    #[test]
    fn transition_functions_are_pure() {
        let t0 = Instant::now();
        let stopped = SessionState::default();
        let step = stopped.start(t0);
        assert_eq!(stopped.phase, Phase::Stopped);
        assert_eq!(step.state.phase, Phase::Running);
        assert_eq!(step.event, Some(SessionEvent::Started(SessionKind::Work)));
    }
}
