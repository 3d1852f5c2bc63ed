//! Alarm delivery subsystem
//!
//! Probes playback mechanisms once at startup, then drives a continuous
//! alarm from a background task that walks an ordered fallback chain each
//! iteration: configured sound file, synthesized tone, terminal bell,
//! platform command, and finally a textual alert that cannot fail. Playback
//! never blocks the frame loop and playback errors never escape the chain.

pub mod backend;
pub mod driver;
pub mod selector;

pub use backend::{build_chain, AlarmBackend};
pub use driver::AlarmDriver;
pub use selector::select_backend;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Alarm delivery error types
#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Failed to load alarm sound: {0}")]
    Load(String),

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Alarm command failed: {0}")]
    Command(String),

    #[error("No platform alarm command on this OS")]
    UnsupportedPlatform,
}

/// Alarm delivery mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Backend {
    /// No external resource loaded; built-in mechanisms only
    #[default]
    None,

    /// Configured sound file played through the audio output
    PrimaryFile,

    /// Synthesized tone beep
    SystemBeep,

    /// ASCII BEL to the controlling terminal
    TerminalBell,

    /// Platform shell command producing audible or spoken output
    PlatformCommand,
}

impl Backend {
    /// Short label for on-screen display
    pub fn label(&self) -> &'static str {
        match self {
            Backend::None => "built-in",
            Backend::PrimaryFile => "file",
            Backend::SystemBeep => "beep",
            Backend::TerminalBell => "bell",
            Backend::PlatformCommand => "command",
        }
    }
}

/// Alarm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Path to the alarm sound file (wav, mp3, flac, or ogg)
    pub sound_path: Option<PathBuf>,

    /// Playback volume multiplier
    pub volume: f32,

    /// Pause between file playback repetitions (milliseconds)
    pub repeat_pause_ms: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            sound_path: None,
            volume: 1.0,
            repeat_pause_ms: 500,
        }
    }
}
