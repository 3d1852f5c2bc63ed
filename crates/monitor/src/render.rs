//! Frame rendering seam
//!
//! On-screen drawing is an external sink; the frame loop hands it the
//! per-frame observables and the eye contours and honors a quit request
//! in return. The bundled console sink logs status lines for headless runs.

use camera_capture::VideoFrame;
use serde::Serialize;
use tracing::info;

/// Per-frame observables for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct FrameOverlay {
    /// Whether a usable face was detected this frame
    pub face_detected: bool,

    /// EAR for this frame, if a face was usable
    pub ear: Option<f64>,

    /// Consecutive frames with EAR below threshold
    pub consecutive_low_frames: u32,

    /// Whether the alarm is currently active
    pub alarm_active: bool,

    /// Label of the selected alarm backend
    pub backend_label: &'static str,

    /// Left eye contour in pixel coordinates
    pub left_eye: Vec<(i32, i32)>,

    /// Right eye contour in pixel coordinates
    pub right_eye: Vec<(i32, i32)>,
}

/// Renderer response to a presented frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCommand {
    Continue,
    Quit,
}

/// External rendering sink
pub trait FrameSink: Send {
    fn present(&mut self, frame: &VideoFrame, overlay: &FrameOverlay) -> SinkCommand;
}

/// Logs a status line instead of drawing; for headless runs.
/// Quiet frames are sampled to keep the log readable; alarm frames always
/// log.
pub struct ConsoleSink {
    every: u32,
    presented: u32,
}

impl ConsoleSink {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
        }
    }
}

impl FrameSink for ConsoleSink {
    fn present(&mut self, _frame: &VideoFrame, overlay: &FrameOverlay) -> SinkCommand {
        self.presented = self.presented.wrapping_add(1);

        if overlay.alarm_active || self.presented % self.every == 0 {
            match overlay.ear {
                Some(ear) => info!(
                    "EAR {:.3} | counter {} | alarm {} | audio {}",
                    ear,
                    overlay.consecutive_low_frames,
                    if overlay.alarm_active { "ACTIVE" } else { "inactive" },
                    overlay.backend_label,
                ),
                None => info!("No face detected"),
            }
        }
        SinkCommand::Continue
    }
}
