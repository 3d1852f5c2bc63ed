//! Detection configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range ({min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("trigger_frames must be at least 1")]
    ZeroTriggerFrames,
}

/// Drowsiness detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Eye aspect ratio threshold; frames below it count as eyes-closed
    pub ear_threshold: f64,

    /// Consecutive below-threshold frames required to trigger the alarm
    pub trigger_frames: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.68,
            trigger_frames: 100,
        }
    }
}

impl DetectionConfig {
    /// Check the configured values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ear_threshold > 0.0 && self.ear_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "ear_threshold",
                value: self.ear_threshold,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.trigger_frames == 0 {
            return Err(ConfigError::ZeroTriggerFrames);
        }
        Ok(())
    }
}
