//! Webcam frame acquisition
//!
//! Video capture is an external collaborator of the monitor: the frame loop
//! only depends on the [`FrameSource`] trait. Two sources ship in-tree:
//! a device-node camera reading MJPEG frames, and a synthetic pattern
//! generator for running the pipeline without cabin hardware.

pub mod device;
pub mod frame;
pub mod synthetic;

pub use device::DeviceCamera;
pub use frame::VideoFrame;
pub use synthetic::SyntheticCamera;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Webcam index (0 for the default webcam)
    pub index: u32,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
    /// Use the synthetic pattern source instead of a device
    pub synthetic: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 800,
            height: 600,
            fps: 30,
            synthetic: false,
        }
    }
}

impl CameraConfig {
    /// Device node for the configured webcam index
    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/video{}", self.index))
    }

    /// Config for the synthetic source
    pub fn synthetic() -> Self {
        Self {
            synthetic: true,
            ..Default::default()
        }
    }
}

/// Source of video frames.
///
/// `Ok(None)` means the stream has ended; a recoverable per-frame failure
/// is an `Err` the caller may log and skip.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;
}

/// Open the frame source described by the configuration.
/// Failure to acquire a device is fatal to startup.
pub fn open_source(config: &CameraConfig) -> Result<Box<dyn FrameSource>, CaptureError> {
    if config.synthetic {
        Ok(Box::new(SyntheticCamera::new(config)))
    } else {
        Ok(Box::new(DeviceCamera::open(config)?))
    }
}
