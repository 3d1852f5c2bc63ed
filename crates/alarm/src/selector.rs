//! Startup audio backend selection
//!
//! Runs exactly once per process lifetime; the result is immutable. Only
//! resource-backed mechanisms are probed here: built-in mechanisms need no
//! resource and always sit in the session chain.

use tracing::{info, warn};

use crate::backend::{AlarmBackend, FileBackend};
use crate::{AlarmConfig, Backend};

/// Probe the ordered resource-backed playback mechanisms against the
/// configured alarm sound. The first mechanism that loads the resource
/// wins; a missing or undecodable resource leaves the monitor on built-in
/// mechanisms (`Backend::None`). Failure reasons are logged for diagnostics.
pub fn select_backend(config: &AlarmConfig) -> Backend {
    let Some(path) = &config.sound_path else {
        info!("No alarm sound configured; using built-in alarm");
        return Backend::None;
    };

    if !path.exists() {
        warn!("Alarm sound not found: {}", path.display());
        info!("Using built-in alarm as fallback");
        return Backend::None;
    }

    let mut candidates: Vec<Box<dyn AlarmBackend>> = vec![Box::new(FileBackend::new(
        path.clone(),
        config.volume,
        config.repeat_pause_ms,
    ))];

    for candidate in candidates.iter_mut() {
        match candidate.try_load() {
            Ok(()) => {
                info!(
                    "Using {} backend to play {}",
                    candidate.name(),
                    path.display()
                );
                return candidate.kind();
            }
            Err(e) => warn!(
                "{} backend failed to load {}: {}",
                candidate.name(),
                path.display(),
                e
            ),
        }
    }

    warn!("No playback mechanism could load the alarm sound");
    info!("Using built-in alarm as fallback");
    Backend::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("alarm-selector-{}-{}", std::process::id(), name))
    }

    /// Minimal mono 16-bit PCM WAV: 100 ms of silence at 8 kHz
    fn write_test_wav(path: &PathBuf) {
        let sample_rate = 8000u32;
        let samples = vec![0i16; (sample_rate / 10) as usize];

        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + samples.len() as u32 * 2).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(samples.len() as u32 * 2).to_le_bytes());
        for sample in &samples {
            wav.extend_from_slice(&sample.to_le_bytes());
        }

        std::fs::File::create(path)
            .and_then(|mut f| f.write_all(&wav))
            .expect("write test wav");
    }

    #[test]
    fn no_path_selects_builtin() {
        let config = AlarmConfig::default();
        assert_eq!(select_backend(&config), Backend::None);
    }

    #[test]
    fn missing_file_selects_builtin() {
        let config = AlarmConfig {
            sound_path: Some(temp_path("does-not-exist.wav")),
            ..Default::default()
        };
        assert_eq!(select_backend(&config), Backend::None);
    }

    #[test]
    fn undecodable_file_selects_builtin() {
        let path = temp_path("garbage.wav");
        std::fs::write(&path, [0u8; 32]).expect("write garbage");

        let config = AlarmConfig {
            sound_path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(select_backend(&config), Backend::None);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decodable_file_selects_primary() {
        let path = temp_path("ok.wav");
        write_test_wav(&path);

        let config = AlarmConfig {
            sound_path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(select_backend(&config), Backend::PrimaryFile);
        let _ = std::fs::remove_file(path);
    }
}
