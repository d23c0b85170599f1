use tracing::trace;

use super::{LoopAudioPlayer, OneShotAudioPlayer};
use crate::session::{SessionEvent, SessionKind};

/// Turns session transitions and volume changes into player commands.
///
/// Holds no state of its own beyond the two players.
#[derive(Debug)]
pub struct AudioCueDispatcher<L, O> {
    background: L,
    cue: O,
}

impl<L: LoopAudioPlayer, O: OneShotAudioPlayer> AudioCueDispatcher<L, O> {
    pub fn new(background: L, cue: O) -> Self {
        Self { background, cue }
    }

    pub fn on_session_event(&mut self, event: SessionEvent) {
        trace!(?event, "dispatching audio");
        match event {
            SessionEvent::Started(kind) => self.background_for(kind),
            SessionEvent::Paused => self.background.pause(),
            SessionEvent::Reset => {
                self.background.pause();
                self.background.rewind();
            }
            SessionEvent::Completed(finished) => {
                // cue first, whatever starts next
                self.cue.rewind();
                self.cue.play();
                self.background_for(finished.next());
            }
        }
    }

    pub fn on_volume_changed(&mut self, level: f32) {
        trace!(level, "background volume");
        self.background.set_volume(level);
    }

    fn background_for(&mut self, kind: SessionKind) {
        match kind {
            SessionKind::Work => self.background.play(),
            SessionKind::Break => self.background.pause(),
        }
    }

    pub fn background(&self) -> &L {
        &self.background
    }

    pub fn cue(&self) -> &O {
        &self.cue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, RecordingPlayer};

    fn dispatcher() -> (
        AudioCueDispatcher<RecordingPlayer, RecordingPlayer>,
        RecordingPlayer,
        RecordingPlayer,
    ) {
        let bg = RecordingPlayer::new();
        let cue = RecordingPlayer::new();
        (
            AudioCueDispatcher::new(bg.clone(), cue.clone()),
            bg,
            cue,
        )
    }

    #[test]
    fn work_start_plays_background() {
        let (mut d, bg, cue) = dispatcher();
        d.on_session_event(SessionEvent::Started(SessionKind::Work));
        assert_eq!(bg.commands(), vec![AudioCommand::Play]);
        assert!(cue.commands().is_empty());
    }

    #[test]
    fn break_start_pauses_background() {
        let (mut d, bg, _cue) = dispatcher();
        d.on_session_event(SessionEvent::Started(SessionKind::Break));
        assert_eq!(bg.commands(), vec![AudioCommand::Pause]);
    }

    #[test]
    fn pause_keeps_position() {
        let (mut d, bg, _cue) = dispatcher();
        d.on_session_event(SessionEvent::Paused);
        assert_eq!(bg.commands(), vec![AudioCommand::Pause]);
    }

    #[test]
    fn reset_pauses_then_rewinds() {
        let (mut d, bg, _cue) = dispatcher();
        d.on_session_event(SessionEvent::Reset);
        assert_eq!(bg.commands(), vec![AudioCommand::Pause, AudioCommand::Rewind]);
    }

    #[test]
    fn completion_fires_cue_then_next_background() {
        let (mut d, bg, cue) = dispatcher();

        d.on_session_event(SessionEvent::Completed(SessionKind::Work));
        assert_eq!(cue.commands(), vec![AudioCommand::Rewind, AudioCommand::Play]);
        assert_eq!(bg.commands(), vec![AudioCommand::Pause]);

        d.on_session_event(SessionEvent::Completed(SessionKind::Break));
        assert_eq!(cue.count(AudioCommand::Play), 2);
        assert_eq!(bg.last(), Some(AudioCommand::Play));
    }

    #[test]
    fn cue_precedes_background_action() {
        // one shared log for both players exposes the interleaving
        let shared = RecordingPlayer::new();
        let mut d = AudioCueDispatcher::new(shared.clone(), shared.clone());

        d.on_session_event(SessionEvent::Completed(SessionKind::Break));

        assert_eq!(
            shared.commands(),
            vec![AudioCommand::Rewind, AudioCommand::Play, AudioCommand::Play]
        );
    }

    #[test]
    fn volume_goes_to_background_only() {
        let (mut d, bg, cue) = dispatcher();
        d.on_volume_changed(0.7);
        assert_eq!(bg.commands(), vec![AudioCommand::SetVolume(0.7)]);
        assert!(cue.commands().is_empty());
    }
}
