//! Per-frame detection status

use serde::{Deserialize, Serialize};

/// Alarm lifecycle transition reported by the state machine.
/// The frame loop dispatches these to the alarm driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmTransition {
    /// Drowsiness confirmed; the alarm should start
    Started,
    /// Eyes reopened; the alarm should stop
    Stopped,
}

/// Observable state after processing one frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameStatus {
    /// EAR for this frame, `None` when no face was usable
    pub ear: Option<f64>,

    /// Consecutive frames with EAR below threshold
    pub consecutive_low_frames: u32,

    /// Whether the alarm is currently requested
    pub alarm_active: bool,

    /// Transition triggered by this frame, if any
    pub transition: Option<AlarmTransition>,
}
