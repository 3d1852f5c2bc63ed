//! Detection state tracking

use serde::{Deserialize, Serialize};

/// Detection state (tracked across frames)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DetectionState {
    /// Consecutive frames with EAR below threshold
    pub consecutive_low_frames: u32,

    /// Whether the alarm is currently requested
    pub alarm_active: bool,
}

impl DetectionState {
    /// Reset to startup state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
