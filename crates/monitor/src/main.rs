//! Drowsiness Monitor - Main Entry Point

use std::sync::atomic::Ordering;

use alarm::{AlarmDriver, Backend};
use monitor::detect::ScriptedDetector;
use monitor::render::ConsoleSink;
use monitor::{init_logging, MonitorConfig, Pipeline};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config_path = std::env::args().nth(1);
    let config = MonitorConfig::load(config_path.as_deref())?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("EAR threshold: {}", config.detection.ear_threshold);
    info!(
        "Consecutive frames to trigger: {}",
        config.detection.trigger_frames
    );

    let backend = alarm::select_backend(&config.alarm);
    match (backend, &config.alarm.sound_path) {
        (Backend::PrimaryFile, Some(path)) => info!("Alarm sound: {}", path.display()),
        _ => info!("Alarm: built-in mechanisms"),
    }

    info!("Starting video stream...");
    let mut source = camera_capture::open_source(&config.camera)?;

    // Landmark detection is an external service; the bundled scripted
    // detector replays a canned drowsy episode so the pipeline runs end to
    // end against the synthetic camera.
    let mut landmarks = ScriptedDetector::demo_episode();
    let mut sink = ConsoleSink::new(30);

    let driver = AlarmDriver::new(&config.alarm, backend);
    let mut pipeline = Pipeline::new(&config, driver)?;

    let shutdown = pipeline.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received; shutting down");
            shutdown.store(true, Ordering::Release);
        }
    });

    info!("Drowsiness monitor started. Press Ctrl-C to quit.");
    pipeline
        .run(source.as_mut(), &mut landmarks, &mut sink)
        .await;

    info!("System stopped");
    Ok(())
}
