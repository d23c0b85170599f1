use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::audio::{LoopAudioPlayer, OneShotAudioPlayer};

/// Seconds cut from the end of a looping track to hide the seam
pub const LOOP_TAIL_TRIM_SECS: f32 = 0.1;

#[derive(Debug)]
struct Playhead {
    position: usize,
    playing: bool,
    volume: f32,
}

/// One decoded track plus its playhead, shared with the output callback
#[derive(Debug)]
pub struct Voice {
    samples: Vec<f32>,
    /// Loop point in samples; `None` plays once and stops at the end
    loop_end: Option<usize>,
    playhead: Mutex<Playhead>,
}

/// Loop point after trimming `LOOP_TAIL_TRIM_SECS` of frames.
/// Tracks shorter than the trim loop over their whole length.
pub fn loop_end(len: usize, sample_rate: u32, channels: usize) -> usize {
    let trim = (sample_rate as f32 * LOOP_TAIL_TRIM_SECS) as usize * channels;
    match len.checked_sub(trim) {
        Some(end) if end > 0 => end,
        _ => len,
    }
}

impl Voice {
    pub fn looping(samples: Vec<f32>, sample_rate: u32, channels: usize, volume: f32) -> Self {
        let end = loop_end(samples.len(), sample_rate, channels);
        Self::build(samples, Some(end), volume)
    }

    pub fn one_shot(samples: Vec<f32>, volume: f32) -> Self {
        Self::build(samples, None, volume)
    }

    fn build(samples: Vec<f32>, loop_end: Option<usize>, volume: f32) -> Self {
        Self {
            samples,
            loop_end,
            playhead: Mutex::new(Playhead {
                position: 0,
                playing: false,
                volume: volume.clamp(0.0, 1.0),
            }),
        }
    }

    fn playhead(&self) -> MutexGuard<'_, Playhead> {
        // a panic elsewhere must not silence audio for good
        self.playhead.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_playing(&self) -> bool {
        self.playhead().playing
    }

    pub fn position(&self) -> usize {
        self.playhead().position
    }

    pub fn volume(&self) -> f32 {
        self.playhead().volume
    }

    fn set_playing(&self, playing: bool) {
        self.playhead().playing = playing;
    }

    fn rewind(&self) {
        self.playhead().position = 0;
    }

    fn set_volume(&self, volume: f32) {
        self.playhead().volume = volume.clamp(0.0, 1.0);
    }

    /// Add this voice into `out`, advancing the playhead
    pub fn mix_into(&self, out: &mut [f32]) {
        let mut head = self.playhead();
        if !head.playing || self.samples.is_empty() {
            return;
        }
        let end = self.loop_end.unwrap_or(self.samples.len());
        let volume = head.volume;
        for slot in out.iter_mut() {
            if head.position >= end {
                if self.loop_end.is_some() {
                    head.position = 0;
                } else {
                    head.playing = false;
                    break;
                }
            }
            *slot += self.samples[head.position] * volume;
            head.position += 1;
        }
    }
}

/// Keeps the output thread alive while any handle exists
#[derive(Debug)]
pub struct StreamGuard {
    _shutdown: std::sync::mpsc::Sender<()>,
}

impl StreamGuard {
    pub fn new(shutdown: std::sync::mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: shutdown,
        }
    }
}

/// Background loop backed by a [`Voice`]
#[derive(Debug, Clone)]
pub struct LoopHandle {
    voice: Arc<Voice>,
    _guard: Arc<StreamGuard>,
}

impl LoopHandle {
    pub fn new(voice: Arc<Voice>, guard: Arc<StreamGuard>) -> Self {
        Self {
            voice,
            _guard: guard,
        }
    }
}

impl LoopAudioPlayer for LoopHandle {
    fn play(&mut self) {
        self.voice.set_playing(true);
    }

    fn pause(&mut self) {
        self.voice.set_playing(false);
    }

    fn rewind(&mut self) {
        self.voice.rewind();
    }

    fn set_volume(&mut self, level: f32) {
        self.voice.set_volume(level);
    }
}

/// Completion cue backed by a [`Voice`]; its volume never changes
#[derive(Debug, Clone)]
pub struct CueHandle {
    voice: Arc<Voice>,
    _guard: Arc<StreamGuard>,
}

impl CueHandle {
    pub fn new(voice: Arc<Voice>, guard: Arc<StreamGuard>) -> Self {
        Self {
            voice,
            _guard: guard,
        }
    }
}

impl OneShotAudioPlayer for CueHandle {
    fn play(&mut self) {
        self.voice.set_playing(true);
    }

    fn rewind(&mut self) {
        self.voice.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> Arc<StreamGuard> {
        let (tx, _rx) = std::sync::mpsc::channel();
        Arc::new(StreamGuard::new(tx))
    }

    #[test]
    fn loop_end_trims_a_tenth_of_a_second() {
        // 1s of stereo at 1kHz: trim 100 frames = 200 samples
        assert_eq!(loop_end(2_000, 1_000, 2), 1_800);
    }

    #[test]
    fn short_tracks_loop_whole() {
        assert_eq!(loop_end(150, 1_000, 2), 150);
        assert_eq!(loop_end(200, 1_000, 2), 200);
    }

    #[test]
    fn paused_voice_adds_nothing() {
        let voice = Voice::one_shot(vec![1.0; 8], 1.0);
        let mut out = vec![0.0; 4];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![0.0; 4]);
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn one_shot_stops_at_end_until_rewound() {
        let voice = Arc::new(Voice::one_shot(vec![0.5; 3], 0.5));
        let mut cue = CueHandle::new(Arc::clone(&voice), guard());
        cue.play();

        let mut out = vec![0.0; 5];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![0.25, 0.25, 0.25, 0.0, 0.0]);
        assert!(!voice.is_playing());

        // play without rewind stays silent
        cue.play();
        let mut out = vec![0.0; 2];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![0.0, 0.0]);

        cue.rewind();
        cue.play();
        let mut out = vec![0.0; 1];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![0.25]);
    }

    #[test]
    fn loop_wraps_at_loop_point() {
        // rate 10 Hz mono: trim 1 frame
        let voice = Arc::new(Voice::looping(vec![1.0, 2.0, 3.0, 9.0], 10, 1, 1.0));
        let mut bg = LoopHandle::new(Arc::clone(&voice), guard());
        bg.play();

        let mut out = vec![0.0; 7];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn pause_keeps_position_and_rewind_resets_it() {
        let voice = Arc::new(Voice::looping(vec![0.1; 100], 10, 1, 1.0));
        let mut bg = LoopHandle::new(Arc::clone(&voice), guard());
        bg.play();
        voice.mix_into(&mut [0.0; 10]);
        bg.pause();
        voice.mix_into(&mut [0.0; 10]);
        assert_eq!(voice.position(), 10);

        bg.rewind();
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn volume_is_clamped_and_applied() {
        let voice = Arc::new(Voice::looping(vec![1.0; 100], 10, 1, 1.0));
        let mut bg = LoopHandle::new(Arc::clone(&voice), guard());
        bg.set_volume(4.0);
        assert_eq!(voice.volume(), 1.0);
        bg.set_volume(0.5);
        bg.play();
        let mut out = vec![0.0; 2];
        voice.mix_into(&mut out);
        assert_eq!(out, vec![0.5, 0.5]);
    }
}
