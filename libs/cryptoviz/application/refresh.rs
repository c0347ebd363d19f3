//! Periodic refresh of a dashboard panel

use parking_lot::RwLock;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// What a panel renders: latest data, latest error, first-load flag
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Default for RefreshState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }
}

struct Shared<T> {
    state: RwLock<RefreshState<T>>,
    active: AtomicBool,
    trigger: Notify,
}

/// Runs a fetch immediately and then on every interval tick
///
/// A failed fetch records its message and keeps the previous data. Results
/// that resolve after [`AutoRefresh::stop`] are discarded.
pub struct AutoRefresh<T> {
    shared: Arc<Shared<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> AutoRefresh<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start refreshing; must be called inside a tokio runtime
    pub fn spawn<F, Fut, E>(fetch: F, interval: Duration) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: RwLock::new(RefreshState::default()),
            active: AtomicBool::new(true),
            trigger: Notify::new(),
        });

        // tokio rejects a zero period
        let period = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(run(Arc::clone(&shared), fetch, period));

        Self {
            shared,
            task: Some(task),
        }
    }

    /// A refresher that never fetches
    pub fn disabled() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(RefreshState::default()),
                active: AtomicBool::new(false),
                trigger: Notify::new(),
            }),
            task: None,
        }
    }

    /// Fetch now, outside the regular schedule
    pub fn refresh(&self) {
        if !self.is_running() {
            return;
        }
        self.shared.state.write().is_loading = true;
        self.shared.trigger.notify_one();
    }

    pub fn state(&self) -> RefreshState<T> {
        self.shared.state.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&mut self) {
        {
            let _guard = self.shared.state.write();
            self.shared.active.store(false, Ordering::Release);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for AutoRefresh<T> {
    fn drop(&mut self) {
        {
            let _guard = self.shared.state.write();
            self.shared.active.store(false, Ordering::Release);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run<T, F, Fut, E>(shared: Arc<Shared<T>>, fetch: F, period: Duration)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shared.trigger.notified() => debug!("Manual refresh requested"),
        }

        {
            let mut state = shared.state.write();
            if !shared.active.load(Ordering::Acquire) {
                return;
            }
            state.error = None;
        }

        let result = fetch().await;

        let mut state = shared.state.write();
        if !shared.active.load(Ordering::Acquire) {
            return;
        }
        match result {
            Ok(data) => state.data = Some(data),
            Err(e) => {
                debug!("Refresh failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
        state.is_loading = false;
    }
}
