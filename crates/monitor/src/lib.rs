//! Real-time drowsiness monitor
//!
//! Wires the capture, landmark, detection, and alarm subsystems into one
//! frame loop: webcam frames go through an external landmark service, the
//! eye aspect ratio feeds the temporal drowsiness state machine, and alarm
//! transitions are dispatched to the background alarm driver. The loop's
//! observables (EAR, counter, alarm state, backend label, eye contours)
//! are handed to an external rendering sink each frame.

pub mod config;
pub mod detect;
pub mod pipeline;
pub mod render;

pub use config::MonitorConfig;
pub use pipeline::Pipeline;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize the global tracing subscriber
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
