//! Graceful shutdown for the long-running binaries

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tracing::info;

/// Running flag flipped by Ctrl+C or by [`ShutdownManager::trigger`]
#[derive(Clone)]
pub struct ShutdownManager {
    running: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Spawn a Ctrl+C handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal (Ctrl+C)");
                manager.trigger();
            }
        });
    }

    pub fn trigger(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("Shutting down gracefully...");
        }
        self.notify.notify_waiters();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Resolves once shutdown has been triggered
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }

    /// Sleep for `duration`, waking early on shutdown
    ///
    /// Returns `false` if shutdown cut the sleep short.
    pub async fn interruptible_sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_running(),
            _ = self.wait() => false,
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
