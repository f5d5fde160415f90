//! Cooperative shutdown signal shared between a listener and its interrupt handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

/// Granularity of [`Shutdown::sleep_blocking`]
const POLL_SLICE: Duration = Duration::from_millis(50);

/// Cloneable stop signal.
///
/// Blocking code polls [`Shutdown::is_triggered`]; async code awaits
/// [`Shutdown::wait`]. Once triggered it stays triggered.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    triggered: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every waiter.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Block the current thread for `duration`, waking early if the signal
    /// is raised. Returns true if it was.
    pub fn sleep_blocking(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        while !self.is_triggered() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep((deadline - now).min(POLL_SLICE));
        }

        true
    }

    /// Wait until the signal is raised. Returns immediately if it already was.
    pub async fn wait(&self) {
        loop {
            // Register before checking the flag so a concurrent trigger is not missed
            let notified = self.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }

    /// Raise the signal on Ctrl+C.
    ///
    /// Spawns a task on the current tokio runtime. A failure to install the
    /// handler is logged and leaves the signal untouched.
    pub fn trigger_on_ctrl_c(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::debug!("interrupt received, shutting down");
                    shutdown.trigger();
                }
                Err(e) => log::warn!("could not install Ctrl+C handler: {}", e),
            }
        });
    }
}
