//! Alarm backend strategies
//!
//! Each mechanism implements [`AlarmBackend`]; a session's fallback chain is
//! an ordered list of boxed strategies tried in sequence until one delivers.
//! Playback runs on the alarm task's thread, so every sleep goes through
//! [`sleep_while_running`] to keep the stop signal responsive.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::error;

use crate::{AlarmConfig, AlarmError, Backend};

/// Poll granularity for stop-aware sleeps
const STOP_POLL: Duration = Duration::from_millis(50);

/// Sleep in short slices so a cleared running flag is observed promptly
pub(crate) fn sleep_while_running(running: &AtomicBool, total: Duration) {
    let mut remaining = total;
    while running.load(Ordering::Acquire) && !remaining.is_zero() {
        let slice = remaining.min(STOP_POLL);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}

/// A single alarm delivery strategy
pub trait AlarmBackend {
    /// Mechanism this strategy implements
    fn kind(&self) -> Backend;

    /// Name for logging
    fn name(&self) -> &'static str;

    /// Probe whether the strategy can load its resource
    fn try_load(&mut self) -> Result<(), AlarmError>;

    /// One bounded playback attempt. Implementations check `running` at
    /// every sleep boundary and return early when it clears.
    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError>;
}

/// Ordered fallback chain for one alarm session.
///
/// The selected file backend (if any) leads; built-in mechanisms follow in
/// strict priority order, ending with the infallible visual alert.
pub fn build_chain(config: &AlarmConfig, selected: Backend) -> Vec<Box<dyn AlarmBackend>> {
    let mut chain: Vec<Box<dyn AlarmBackend>> = Vec::new();

    if selected == Backend::PrimaryFile {
        if let Some(path) = &config.sound_path {
            chain.push(Box::new(FileBackend::new(
                path.clone(),
                config.volume,
                config.repeat_pause_ms,
            )));
        }
    }

    chain.push(Box::new(ToneBackend::new(config.volume)));
    chain.push(Box::new(BellBackend::new()));
    chain.push(Box::new(CommandBackend::new()));
    chain.push(Box::new(VisualBackend::new()));
    chain
}

/// Lazily opened audio output, kept for the lifetime of one alarm session.
/// Dropping it releases the output device.
struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    fn open() -> Result<Self, AlarmError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AlarmError::Output(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

/// Open the audio output on first use and hand back a sink handle
fn ensure_output(slot: &mut Option<AudioOutput>) -> Result<OutputStreamHandle, AlarmError> {
    let output = match slot.take() {
        Some(output) => output,
        None => AudioOutput::open()?,
    };
    let handle = output.handle.clone();
    *slot = Some(output);
    Ok(handle)
}

/// Plays the configured sound file through the default audio output
pub struct FileBackend {
    path: PathBuf,
    volume: f32,
    pause: Duration,
    output: Option<AudioOutput>,
}

impl FileBackend {
    pub fn new(path: PathBuf, volume: f32, pause_ms: u64) -> Self {
        Self {
            path,
            volume,
            pause: Duration::from_millis(pause_ms),
            output: None,
        }
    }

    fn decode(&self) -> Result<Decoder<BufReader<File>>, AlarmError> {
        let file =
            File::open(&self.path).map_err(|e| AlarmError::Load(format!("{}: {}", self.path.display(), e)))?;
        Decoder::new(BufReader::new(file)).map_err(|e| AlarmError::Load(e.to_string()))
    }
}

impl AlarmBackend for FileBackend {
    fn kind(&self) -> Backend {
        Backend::PrimaryFile
    }

    fn name(&self) -> &'static str {
        "file"
    }

    fn try_load(&mut self) -> Result<(), AlarmError> {
        self.decode().map(|_| ())
    }

    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
        let handle = ensure_output(&mut self.output)?;

        let source = self.decode()?.amplify(self.volume);
        let sink = Sink::try_new(&handle).map_err(|e| AlarmError::Playback(e.to_string()))?;
        sink.append(source);

        // Let the clip finish unless the alarm is stopped mid-play
        while running.load(Ordering::Acquire) && !sink.empty() {
            std::thread::sleep(STOP_POLL);
        }
        if !running.load(Ordering::Acquire) {
            sink.stop();
            return Ok(());
        }

        sleep_while_running(running, self.pause);
        Ok(())
    }
}

/// Synthesized tone beep through the audio output
pub struct ToneBackend {
    frequency_hz: f32,
    duration: Duration,
    pause: Duration,
    volume: f32,
    output: Option<AudioOutput>,
}

impl ToneBackend {
    pub fn new(volume: f32) -> Self {
        Self {
            frequency_hz: 1000.0,
            duration: Duration::from_millis(200),
            pause: Duration::from_millis(300),
            volume,
            output: None,
        }
    }
}

impl AlarmBackend for ToneBackend {
    fn kind(&self) -> Backend {
        Backend::SystemBeep
    }

    fn name(&self) -> &'static str {
        "tone"
    }

    fn try_load(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
        let handle = ensure_output(&mut self.output)?;

        let source = SineWave::new(self.frequency_hz)
            .take_duration(self.duration)
            .amplify(self.volume);
        let sink = Sink::try_new(&handle).map_err(|e| AlarmError::Playback(e.to_string()))?;
        sink.append(source);

        while running.load(Ordering::Acquire) && !sink.empty() {
            std::thread::sleep(Duration::from_millis(10));
        }
        sink.stop();

        sleep_while_running(running, self.pause);
        Ok(())
    }
}

/// ASCII BEL to the controlling terminal
pub struct BellBackend {
    repeats: u32,
}

impl BellBackend {
    pub fn new() -> Self {
        Self { repeats: 3 }
    }
}

impl Default for BellBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmBackend for BellBackend {
    fn kind(&self) -> Backend {
        Backend::TerminalBell
    }

    fn name(&self) -> &'static str {
        "bell"
    }

    fn try_load(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
        let mut stdout = io::stdout();
        for _ in 0..self.repeats {
            if !running.load(Ordering::Acquire) {
                return Ok(());
            }
            stdout
                .write_all(b"\x07")
                .and_then(|_| stdout.flush())
                .map_err(|e| AlarmError::Playback(e.to_string()))?;
            sleep_while_running(running, Duration::from_millis(100));
        }
        sleep_while_running(running, Duration::from_millis(500));
        Ok(())
    }
}

/// Audible alarm via a platform shell command
pub struct CommandBackend {
    pause: Duration,
}

impl CommandBackend {
    pub fn new() -> Self {
        Self {
            pause: Duration::from_secs(1),
        }
    }
}

impl Default for CommandBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "linux")]
fn run_platform_command(running: &AtomicBool) -> Result<(), AlarmError> {
    // `beep` drives the PC speaker; fall back to a bounded speaker-test sweep
    if Command::new("beep")
        .args(["-f", "1000", "-l", "200"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
    {
        return Ok(());
    }

    let mut child = Command::new("speaker-test")
        .args(["-t", "sine", "-f", "1000", "-l", "1"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AlarmError::Command(e.to_string()))?;
    sleep_while_running(running, Duration::from_secs(1));
    let _ = child.kill();
    let _ = child.wait();
    Ok(())
}

#[cfg(target_os = "macos")]
fn run_platform_command(_running: &AtomicBool) -> Result<(), AlarmError> {
    let status = Command::new("say")
        .arg("Drowsiness alert")
        .status()
        .map_err(|e| AlarmError::Command(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(AlarmError::Command(format!("say exited with {status}")))
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn run_platform_command(_running: &AtomicBool) -> Result<(), AlarmError> {
    Err(AlarmError::UnsupportedPlatform)
}

impl AlarmBackend for CommandBackend {
    fn kind(&self) -> Backend {
        Backend::PlatformCommand
    }

    fn name(&self) -> &'static str {
        "command"
    }

    fn try_load(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
        run_platform_command(running)?;
        sleep_while_running(running, self.pause);
        Ok(())
    }
}

/// Last-resort textual alert; cannot fail
pub struct VisualBackend {
    pause: Duration,
}

impl VisualBackend {
    pub fn new() -> Self {
        Self {
            pause: Duration::from_secs(1),
        }
    }
}

impl Default for VisualBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmBackend for VisualBackend {
    fn kind(&self) -> Backend {
        Backend::None
    }

    fn name(&self) -> &'static str {
        "visual"
    }

    fn try_load(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
        error!("DROWSINESS ALERT! Wake up and stop to rest!");
        sleep_while_running(running, self.pause);
        Ok(())
    }
}
