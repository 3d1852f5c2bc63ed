//! Landmark detection seam
//!
//! Landmark detection is an external service from the monitor's point of
//! view: the frame loop only depends on the [`LandmarkDetector`] trait and
//! treats every failure as a no-face frame. The bundled scripted detector
//! replays an EAR trace as synthetic landmark sets so the pipeline can run
//! end to end without a face model.

use camera_capture::VideoFrame;
use face_mesh::{mesh, FaceLandmarks, Point};
use thiserror::Error;

/// Landmark detection error types
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Landmark inference failed: {0}")]
    Inference(String),

    #[error("Malformed landmark set: expected {expected} points, got {actual}")]
    Malformed { expected: usize, actual: usize },
}

/// External landmark detection service.
/// `Ok(None)` means no face is visible in the frame.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<FaceLandmarks>, DetectError>;
}

/// Replays a scripted EAR trace as synthetic landmark sets
pub struct ScriptedDetector {
    script: Vec<Option<f64>>,
    cursor: usize,
    repeat: bool,
}

impl ScriptedDetector {
    /// Play the script once, then report no face
    pub fn new(script: Vec<Option<f64>>) -> Self {
        Self {
            script,
            cursor: 0,
            repeat: false,
        }
    }

    /// Cycle the script forever
    pub fn looping(script: Vec<Option<f64>>) -> Self {
        Self {
            repeat: true,
            ..Self::new(script)
        }
    }

    /// Canned episode for demo runs: open eyes, a long drowsy stretch that
    /// trips the default trigger, then recovery.
    pub fn demo_episode() -> Self {
        let mut script = Vec::new();
        script.extend(std::iter::repeat(Some(0.75)).take(60));
        script.extend(std::iter::repeat(Some(0.40)).take(120));
        script.extend(std::iter::repeat(Some(0.75)).take(40));
        Self::looping(script)
    }

    /// Build a mesh whose EAR points produce exactly `ear` for both eyes
    fn mesh_for(ear: f64) -> FaceLandmarks {
        let mut points = vec![Point::default(); mesh::MESH_POINTS];

        // Eye width 0.2; each vertical opening 0.2 * ear makes the ratio
        // come out to exactly `ear`.
        let opening = 0.1 * ear;
        let mut place_eye = |indices: &[usize; 6], x0: f64| {
            points[indices[0]] = Point::new(x0, 0.5);
            points[indices[1]] = Point::new(x0 + 0.05, 0.5 + opening);
            points[indices[2]] = Point::new(x0 + 0.2, 0.5);
            points[indices[3]] = Point::new(x0 + 0.05, 0.5 - opening);
            points[indices[4]] = Point::new(x0 + 0.15, 0.5 + opening);
            points[indices[5]] = Point::new(x0 + 0.15, 0.5 - opening);
        };
        place_eye(&mesh::LEFT_EYE_EAR, 0.25);
        place_eye(&mesh::RIGHT_EYE_EAR, 0.55);

        FaceLandmarks::new(points)
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &VideoFrame) -> Result<Option<FaceLandmarks>, DetectError> {
        if self.script.is_empty() {
            return Ok(None);
        }
        if self.cursor >= self.script.len() {
            if !self.repeat {
                return Ok(None);
            }
            self.cursor = 0;
        }

        let entry = self.script[self.cursor];
        self.cursor += 1;
        Ok(entry.map(Self::mesh_for))
    }
}
