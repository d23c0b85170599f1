//! Background volume in tenths.
//!
//! The level is stored as a whole number of 0.1 steps, so repeated
//! increments and decrements can never drift off the grid and the bound
//! checks are exact integer comparisons.

use tracing::debug;

/// Number of 0.1 steps between silence and full volume
pub const VOLUME_STEPS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeController {
    steps: u8,
}

impl VolumeController {
    /// Build from a level in `[0.0, 1.0]`, snapped to the nearest step.
    /// Out-of-range values are clamped; NaN falls back to full volume.
    pub fn new(level: f32) -> Self {
        let steps = if level.is_nan() {
            VOLUME_STEPS
        } else {
            (level.clamp(0.0, 1.0) * VOLUME_STEPS as f32).round() as u8
        };
        Self { steps }
    }

    pub fn level(&self) -> f32 {
        self.steps as f32 / VOLUME_STEPS as f32
    }

    pub fn is_at_max(&self) -> bool {
        self.steps == VOLUME_STEPS
    }

    pub fn is_at_min(&self) -> bool {
        self.steps == 0
    }

    /// Returns true if the level changed
    pub fn volume_up(&mut self) -> bool {
        if self.is_at_max() {
            return false;
        }
        self.steps += 1;
        debug!(level = self.level(), "volume up");
        true
    }

    /// Returns true if the level changed
    pub fn volume_down(&mut self) -> bool {
        if self.is_at_min() {
            return false;
        }
        self.steps -= 1;
        debug!(level = self.level(), "volume down");
        true
    }
}

impl Default for VolumeController {
    fn default() -> Self {
        Self {
            steps: VOLUME_STEPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full() {
        let vol = VolumeController::default();
        assert_eq!(vol.level(), 1.0);
        assert!(vol.is_at_max());
        assert!(!vol.is_at_min());
    }

    #[test]
    fn five_steps_down_is_half() {
        let mut vol = VolumeController::default();
        for _ in 0..5 {
            assert!(vol.volume_down());
        }
        assert_eq!(vol.level(), 0.5);
    }

    #[test]
    fn clamps_at_zero() {
        let mut vol = VolumeController::default();
        for _ in 0..10 {
            vol.volume_down();
        }
        assert_eq!(vol.level(), 0.0);
        assert!(vol.is_at_min());

        assert!(!vol.volume_down());
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn clamps_at_one() {
        let mut vol = VolumeController::new(0.0);
        for _ in 0..10 {
            vol.volume_up();
        }
        assert_eq!(vol.level(), 1.0);
        assert!(vol.is_at_max());

        assert!(!vol.volume_up());
        assert_eq!(vol.level(), 1.0);
    }

    #[test]
    fn bounds_survive_long_walks() {
        let mut vol = VolumeController::new(0.3);
        for i in 0..1_000 {
            if i % 3 == 0 {
                vol.volume_down();
            } else {
                vol.volume_up();
            }
            assert!((0.0..=1.0).contains(&vol.level()));
        }
        // last iteration (999) steps down from the ceiling
        assert_eq!(vol.level(), 0.9);
    }

    #[test]
    fn new_snaps_and_clamps() {
        assert_eq!(VolumeController::new(0.34).level(), 0.3);
        assert_eq!(VolumeController::new(0.36).level(), 0.4);
        assert_eq!(VolumeController::new(7.0).level(), 1.0);
        assert_eq!(VolumeController::new(-1.0).level(), 0.0);
        assert_eq!(VolumeController::new(f32::NAN).level(), 1.0);
    }
}
