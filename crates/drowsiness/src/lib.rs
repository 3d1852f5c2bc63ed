//! Temporal drowsiness state machine
//!
//! Turns the noisy per-frame eye-aspect-ratio signal into a debounced alarm
//! with hysteresis: the alarm arms only after a configured number of
//! *consecutive* below-threshold frames, and a single normal frame fully
//! resets progress. Frames without a usable face change nothing, so an
//! active alarm stays active while the face is temporarily lost.

pub mod config;
pub mod state;
pub mod status;

pub use config::{ConfigError, DetectionConfig};
pub use state::DetectionState;
pub use status::{AlarmTransition, FrameStatus};

/// Per-frame drowsiness detector
#[derive(Debug, Clone)]
pub struct DrowsinessDetector {
    config: DetectionConfig,
    state: DetectionState,
}

impl DrowsinessDetector {
    /// Create a detector with a validated configuration
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: DetectionState::default(),
        })
    }

    /// Process one frame's EAR sample. `None` means no usable face was
    /// detected; the counter and alarm state are left untouched.
    pub fn process(&mut self, ear: Option<f64>) -> FrameStatus {
        let transition = match ear {
            None => None,
            Some(value) if value < self.config.ear_threshold => {
                self.state.consecutive_low_frames =
                    self.state.consecutive_low_frames.saturating_add(1);

                if self.state.consecutive_low_frames >= self.config.trigger_frames
                    && !self.state.alarm_active
                {
                    self.state.alarm_active = true;
                    Some(AlarmTransition::Started)
                } else {
                    None
                }
            }
            Some(_) => {
                self.state.consecutive_low_frames = 0;
                if self.state.alarm_active {
                    self.state.alarm_active = false;
                    Some(AlarmTransition::Stopped)
                } else {
                    None
                }
            }
        };

        FrameStatus {
            ear,
            consecutive_low_frames: self.state.consecutive_low_frames,
            alarm_active: self.state.alarm_active,
            transition,
        }
    }

    /// Current detection state
    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// Reset to startup state
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detector(threshold: f64, frames: u32) -> DrowsinessDetector {
        DrowsinessDetector::new(DetectionConfig {
            ear_threshold: threshold,
            trigger_frames: frames,
        })
        .unwrap()
    }

    #[test]
    fn drowsy_episode_counter_trace() {
        let mut detector = detector(0.68, 5);
        let samples = [0.7, 0.5, 0.5, 0.5, 0.5, 0.5, 0.7];
        let expected_counters = [0, 1, 2, 3, 4, 5, 0];
        let expected_active = [false, false, false, false, false, true, false];

        for ((sample, counter), active) in samples
            .iter()
            .zip(expected_counters)
            .zip(expected_active)
        {
            let status = detector.process(Some(*sample));
            assert_eq!(status.consecutive_low_frames, counter);
            assert_eq!(status.alarm_active, active);
        }
    }

    #[test]
    fn alarm_starts_exactly_at_trigger_frame() {
        let mut detector = detector(0.68, 3);

        assert_eq!(detector.process(Some(0.5)).transition, None);
        assert_eq!(detector.process(Some(0.5)).transition, None);
        assert_eq!(
            detector.process(Some(0.5)).transition,
            Some(AlarmTransition::Started)
        );
        // Staying drowsy does not re-trigger
        assert_eq!(detector.process(Some(0.5)).transition, None);
    }

    #[test]
    fn normal_frame_stops_alarm_and_resets_counter() {
        let mut detector = detector(0.68, 2);
        detector.process(Some(0.5));
        detector.process(Some(0.5));
        assert!(detector.state().alarm_active);

        let status = detector.process(Some(0.7));
        assert_eq!(status.transition, Some(AlarmTransition::Stopped));
        assert_eq!(status.consecutive_low_frames, 0);
        assert!(!status.alarm_active);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let mut detector = detector(0.68, 1);
        // Exactly at threshold resets, never counts
        let status = detector.process(Some(0.68));
        assert_eq!(status.consecutive_low_frames, 0);
        assert_eq!(status.transition, None);
    }

    #[test]
    fn lost_face_keeps_alarm_and_counter() {
        let mut detector = detector(0.68, 2);
        detector.process(Some(0.5));
        detector.process(Some(0.5));

        let status = detector.process(None);
        assert!(status.alarm_active);
        assert_eq!(status.consecutive_low_frames, 2);
        assert_eq!(status.transition, None);

        // Reappearing with open eyes clears the alarm
        let status = detector.process(Some(0.8));
        assert_eq!(status.transition, Some(AlarmTransition::Stopped));
    }

    #[test]
    fn restart_requires_fresh_run() {
        let mut detector = detector(0.68, 2);
        detector.process(Some(0.5));
        detector.process(Some(0.5));
        detector.process(Some(0.8));

        // One low frame is not enough after a reset
        let status = detector.process(Some(0.5));
        assert_eq!(status.consecutive_low_frames, 1);
        assert!(!status.alarm_active);

        let status = detector.process(Some(0.5));
        assert_eq!(status.transition, Some(AlarmTransition::Started));
    }

    proptest! {
        /// The counter always equals the length of the longest suffix of
        /// below-threshold samples, with no-face frames excluded entirely,
        /// and the alarm is active iff that suffix has reached the trigger.
        #[test]
        fn counter_matches_low_suffix(
            samples in prop::collection::vec(
                prop::option::weighted(0.9, 0.0f64..1.0),
                0..200,
            )
        ) {
            let threshold = 0.5;
            let trigger = 3;
            let mut detector = detector(threshold, trigger);
            let mut suffix = 0u32;

            for sample in samples {
                let status = detector.process(sample);
                if let Some(value) = sample {
                    if value < threshold {
                        suffix += 1;
                    } else {
                        suffix = 0;
                    }
                }
                prop_assert_eq!(status.consecutive_low_frames, suffix);
                prop_assert_eq!(status.alarm_active, suffix >= trigger);
            }
        }
    }
}
