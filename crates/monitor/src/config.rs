//! Monitor configuration
//!
//! Layered load: optional TOML file, then `MONITOR_*` environment
//! overrides, on top of per-crate defaults.

use alarm::AlarmConfig;
use camera_capture::CameraConfig;
use drowsiness::DetectionConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration load/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Read(#[from] config::ConfigError),

    #[error("Invalid detection settings: {0}")]
    Detection(#[from] drowsiness::ConfigError),
}

/// Complete monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub camera: CameraConfig,
    pub detection: DetectionConfig,
    pub alarm: AlarmConfig,
}

impl MonitorConfig {
    /// Load configuration; `path` overrides the default `monitor.toml`
    /// lookup. Missing files fall back to defaults; invalid detection
    /// settings abort startup.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path)),
            None => builder.add_source(config::File::with_name("monitor").required(false)),
        };

        let loaded = builder
            .add_source(config::Environment::with_prefix("MONITOR").separator("__"))
            .build()?;

        let monitor: MonitorConfig = loaded.try_deserialize()?;
        monitor.detection.validate()?;
        Ok(monitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.detection.validate().is_ok());
        assert_eq!(config.camera.index, 0);
        assert!(config.alarm.sound_path.is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = MonitorConfig::load(None).expect("defaults");
        assert_eq!(config.detection.trigger_frames, 100);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(MonitorConfig::load(Some("/nonexistent/monitor.toml")).is_err());
    }
}
