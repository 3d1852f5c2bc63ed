//! Device-node camera source

use std::fs::File;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::{frame, CameraConfig, CaptureError, FrameSource, VideoFrame};

/// Upper bound on one compressed frame
const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

/// Webcam reading MJPEG frames through the device node's read() interface.
///
/// Drivers that only support streaming I/O surface a stream error per frame;
/// the frame loop logs and skips those.
pub struct DeviceCamera {
    file: File,
    sequence: u32,
}

impl DeviceCamera {
    /// Open the configured device node. Failure here aborts startup.
    pub fn open(config: &CameraConfig) -> Result<Self, CaptureError> {
        let path = config.device_path();
        let file = File::open(&path)
            .map_err(|e| CaptureError::Open(format!("{}: {}", path.display(), e)))?;

        info!("Opened capture device {}", path.display());
        Ok(Self { file, sequence: 0 })
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl FrameSource for DeviceCamera {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let mut bytes = vec![0u8; MAX_FRAME_BYTES];
        let n = self
            .file
            .read(&mut bytes)
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        if n == 0 {
            return Ok(None);
        }

        let mut frame = frame::decode_jpeg(&bytes[..n])?;
        frame.timestamp_ms = Self::now_ms();
        frame.sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(Some(frame))
    }
}
