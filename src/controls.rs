use crate::session::{Phase, SessionState};
use crate::volume::VolumeController;

/// Which controls the UI should offer this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStates {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub volume_up_enabled: bool,
    pub volume_down_enabled: bool,
}

pub fn derive_control_states(session: &SessionState, volume: &VolumeController) -> ControlStates {
    let running = session.phase == Phase::Running;
    ControlStates {
        start_enabled: !running,
        stop_enabled: running,
        volume_up_enabled: !volume.is_at_max(),
        volume_down_enabled: !volume.is_at_min(),
    }
}
