//! Alarm lifecycle driver
//!
//! Owns the background playback task for the current alarm session. Start
//! and stop are idempotent, never block the caller, and communicate with
//! the task only through the session's atomic running flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{build_chain, sleep_while_running, AlarmBackend};
use crate::{AlarmConfig, Backend};

/// Factory producing a fresh fallback chain for each alarm session.
///
/// Invoked inside the playback task: audio output handles are not `Send`
/// and must be created on the thread that uses them.
pub type ChainFactory = Arc<dyn Fn() -> Vec<Box<dyn AlarmBackend>> + Send + Sync>;

/// One active-alarm background task
struct AlarmSession {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the alarm background task and its cooperative stop signal
pub struct AlarmDriver {
    factory: ChainFactory,
    backend: Backend,
    session: Option<AlarmSession>,
}

impl AlarmDriver {
    /// Driver for the configured alarm and the backend selected at startup
    pub fn new(config: &AlarmConfig, backend: Backend) -> Self {
        let config = config.clone();
        Self {
            factory: Arc::new(move || build_chain(&config, backend)),
            backend,
            session: None,
        }
    }

    /// Driver over a custom chain factory
    pub fn with_chain_factory(factory: ChainFactory) -> Self {
        Self {
            factory,
            backend: Backend::None,
            session: None,
        }
    }

    /// Backend selected at startup
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Whether an alarm session is currently running
    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.running.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Begin a new alarm session. No-op while a session is already running.
    pub fn start(&mut self) {
        if self.is_active() {
            debug!("Alarm already active; start ignored");
            return;
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let factory = self.factory.clone();
        let handle = tokio::task::spawn_blocking(move || playback_loop(factory, flag));

        info!("Alarm session started");
        self.session = Some(AlarmSession { running, handle });
    }

    /// Signal the running session to stop. Fire-and-forget; no-op when idle.
    pub fn stop(&mut self) {
        if let Some(session) = &self.session {
            if session.running.swap(false, Ordering::AcqRel) {
                info!("Alarm session stopping");
            }
        }
    }

    /// Stop the alarm and wait briefly for the playback task to exit
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(session) = self.session.take() {
            match tokio::time::timeout(Duration::from_secs(2), session.handle).await {
                Ok(_) => debug!("Alarm playback task exited"),
                Err(_) => warn!("Alarm playback task did not exit in time"),
            }
        }
    }
}

/// Continuous playback loop: walk the fallback chain until one mechanism
/// delivers, then repeat until the session flag clears. The task observes
/// a stop within one bounded sleep interval.
fn playback_loop(factory: ChainFactory, running: Arc<AtomicBool>) {
    let mut chain = factory();

    while running.load(Ordering::Acquire) {
        let mut delivered = false;
        for backend in chain.iter_mut() {
            if !running.load(Ordering::Acquire) {
                break;
            }
            match backend.play(&running) {
                Ok(()) => {
                    delivered = true;
                    break;
                }
                Err(e) => warn!("{} alarm failed: {}; trying next mechanism", backend.name(), e),
            }
        }
        if !delivered {
            sleep_while_running(&running, Duration::from_millis(200));
        }
    }

    // Dropping the chain releases any audio output acquired during playback
    drop(chain);
    debug!("Alarm playback loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlarmError;
    use std::sync::atomic::AtomicUsize;

    /// Records every play call and sleeps briefly like a real mechanism
    struct CountingBackend {
        plays: Arc<AtomicUsize>,
    }

    impl AlarmBackend for CountingBackend {
        fn kind(&self) -> Backend {
            Backend::None
        }

        fn name(&self) -> &'static str {
            "counting"
        }

        fn try_load(&mut self) -> Result<(), AlarmError> {
            Ok(())
        }

        fn play(&mut self, running: &AtomicBool) -> Result<(), AlarmError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            sleep_while_running(running, Duration::from_millis(10));
            Ok(())
        }
    }

    fn counting_driver() -> (AlarmDriver, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let sessions = Arc::new(AtomicUsize::new(0));
        let plays = Arc::new(AtomicUsize::new(0));

        let factory_sessions = sessions.clone();
        let factory_plays = plays.clone();
        let driver = AlarmDriver::with_chain_factory(Arc::new(move || {
            factory_sessions.fetch_add(1, Ordering::SeqCst);
            vec![Box::new(CountingBackend {
                plays: factory_plays.clone(),
            }) as Box<dyn AlarmBackend>]
        }));

        (driver, sessions, plays)
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (mut driver, sessions, plays) = counting_driver();

        driver.start();
        driver.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(driver.is_active());
        driver.shutdown().await;

        assert_eq!(sessions.load(Ordering::SeqCst), 1);
        assert!(plays.load(Ordering::SeqCst) >= 1);
        assert!(!driver.is_active());
    }

    #[tokio::test]
    async fn stop_while_idle_is_noop() {
        let (mut driver, sessions, _plays) = counting_driver();

        driver.stop();
        assert!(!driver.is_active());
        assert_eq!(sessions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restart_spawns_fresh_session() {
        let (mut driver, sessions, _plays) = counting_driver();

        driver.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        driver.stop();
        assert!(!driver.is_active());

        driver.start();
        assert!(driver.is_active());
        driver.shutdown().await;

        assert_eq!(sessions.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stopped_task_exits_within_interval() {
        let (mut driver, _sessions, plays) = counting_driver();

        driver.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        driver.stop();

        // Give the task one interval to notice the flag, then verify the
        // loop has gone quiet.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let settled = plays.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(plays.load(Ordering::SeqCst), settled);

        driver.shutdown().await;
    }
}
