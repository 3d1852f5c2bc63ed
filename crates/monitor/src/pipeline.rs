//! Frame loop orchestrator
//!
//! Capture → landmark detection → EAR → state machine → alarm dispatch →
//! render, one frame at a time. The loop never blocks on audio: alarm
//! start/stop are flag operations on the driver, and playback runs on its
//! own task. Detection failures are no-op frames; capture errors are
//! logged and skipped; only the renderer's quit, the end of the stream, or
//! the shutdown flag end the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alarm::AlarmDriver;
use camera_capture::FrameSource;
use drowsiness::{AlarmTransition, ConfigError, DrowsinessDetector};
use face_mesh::{face_ear, mesh, FaceLandmarks};
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::detect::LandmarkDetector;
use crate::render::{FrameOverlay, FrameSink, SinkCommand};

/// Pause after a capture error before retrying
const CAPTURE_RETRY: Duration = Duration::from_millis(10);

/// Frame loop orchestrator owning the detection state and the alarm driver
pub struct Pipeline {
    detector: DrowsinessDetector,
    driver: AlarmDriver,
    shutdown: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(config: &MonitorConfig, driver: AlarmDriver) -> Result<Self, ConfigError> {
        Ok(Self {
            detector: DrowsinessDetector::new(config.detection.clone())?,
            driver,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that ends the loop from another task (e.g. on interrupt)
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Run the frame loop to completion, then tear the alarm down.
    pub async fn run(
        &mut self,
        source: &mut dyn FrameSource,
        landmarks: &mut dyn LandmarkDetector,
        sink: &mut dyn FrameSink,
    ) {
        while !self.shutdown.load(Ordering::Acquire) {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("Frame source ended");
                    break;
                }
                Err(e) => {
                    warn!("Frame capture error: {}", e);
                    tokio::time::sleep(CAPTURE_RETRY).await;
                    continue;
                }
            };

            let face = match landmarks.detect(&frame) {
                Ok(face) => face,
                Err(e) => {
                    // Treated as a no-face frame; the alarm state is untouched
                    warn!("Landmark detection error: {}", e);
                    None
                }
            };

            let ear = face.as_ref().and_then(|lm| {
                let ear = face_ear(lm);
                if ear.is_none() {
                    debug!("Landmark set is missing EAR points; skipping frame");
                }
                ear
            });

            let status = self.detector.process(ear);
            match status.transition {
                Some(AlarmTransition::Started) => {
                    warn!(
                        "Drowsiness detected! EAR {:.3} after {} low frames; starting alarm",
                        status.ear.unwrap_or(0.0),
                        status.consecutive_low_frames,
                    );
                    self.driver.start();
                }
                Some(AlarmTransition::Stopped) => {
                    info!(
                        "EAR returned to normal ({:.3}); stopping alarm",
                        status.ear.unwrap_or(0.0),
                    );
                    self.driver.stop();
                }
                None => {}
            }

            let overlay = self.overlay(&status, face.as_ref(), frame.width, frame.height);
            if sink.present(&frame, &overlay) == SinkCommand::Quit {
                info!("Quit requested by renderer");
                break;
            }

            tokio::task::yield_now().await;
        }

        info!("Shutting down...");
        self.driver.shutdown().await;
    }

    fn overlay(
        &self,
        status: &drowsiness::FrameStatus,
        face: Option<&FaceLandmarks>,
        width: u32,
        height: u32,
    ) -> FrameOverlay {
        let project = |indices: &[usize]| {
            face.and_then(|lm| lm.project(indices, width, height))
                .unwrap_or_default()
        };

        FrameOverlay {
            face_detected: face.is_some(),
            ear: status.ear,
            consecutive_low_frames: status.consecutive_low_frames,
            alarm_active: status.alarm_active,
            backend_label: self.driver.backend().label(),
            left_eye: project(&mesh::LEFT_EYE_CONTOUR),
            right_eye: project(&mesh::RIGHT_EYE_CONTOUR),
        }
    }
}
