//! Synthetic frame source

use crate::{CameraConfig, CaptureError, FrameSource, VideoFrame};

/// Deterministic test-pattern source for running the pipeline without
/// cabin hardware, and for driving integration tests.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_interval_ms: u64,
    remaining: Option<u64>,
    sequence: u32,
}

impl SyntheticCamera {
    /// Endless pattern source with the configured geometry
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            frame_interval_ms: 1000 / config.fps.max(1) as u64,
            remaining: None,
            sequence: 0,
        }
    }

    /// Pattern source that ends after `count` frames
    pub fn with_frames(config: &CameraConfig, count: u64) -> Self {
        Self {
            remaining: Some(count),
            ..Self::new(config)
        }
    }
}

impl FrameSource for SyntheticCamera {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }

        // Block at the configured frame rate like a real camera would
        if self.sequence > 0 {
            std::thread::sleep(std::time::Duration::from_millis(self.frame_interval_ms));
        }

        // Diagonal gradient that drifts with the sequence number
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let value = x.wrapping_add(y).wrapping_add(self.sequence) as u8;
                data.extend_from_slice(&[value, value, value]);
            }
        }

        let frame = VideoFrame::new(
            data,
            self.width,
            self.height,
            self.sequence as u64 * self.frame_interval_ms,
            self.sequence,
        );
        self.sequence = self.sequence.wrapping_add(1);
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_source_ends() {
        let config = CameraConfig::synthetic();
        let mut camera = SyntheticCamera::with_frames(&config, 3);

        for expected in 0..3u32 {
            let frame = camera.next_frame().unwrap().expect("frame");
            assert_eq!(frame.sequence, expected);
            assert_eq!(frame.data.len(), (config.width * config.height * 3) as usize);
        }
        assert!(camera.next_frame().unwrap().is_none());
    }

    #[test]
    fn timestamps_follow_fps() {
        let config = CameraConfig {
            fps: 10,
            ..CameraConfig::synthetic()
        };
        let mut camera = SyntheticCamera::new(&config);
        let first = camera.next_frame().unwrap().unwrap();
        let second = camera.next_frame().unwrap().unwrap();
        assert_eq!(second.timestamp_ms - first.timestamp_ms, 100);
    }
}
