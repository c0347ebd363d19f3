use super::config::{AcquisitionConfig, Result};
use super::feed::{
    PushOutcome, SnapshotFeed, CHANNEL_CLOSED_MESSAGE, CHANNEL_FAILED_MESSAGE,
    MALFORMED_FRAME_MESSAGE, OPEN_FAILED_MESSAGE,
};
use super::ports::SnapshotSource;
use super::view::{PolicyEvent, PolicyView};
use crate::domain::{ConnectionState, Snapshot};
use crate::infrastructure::ApiClient;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::RwLock;
use pushsockets::{ChannelEvent, Connector, PushChannel, ReconnectionStrategy, TungsteniteConnector};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

type OpenFuture<'a> = Pin<Box<dyn Future<Output = pushsockets::Result<PushChannel>> + Send + 'a>>;

struct Cycle {
    feed: SnapshotFeed,
    task: JoinHandle<()>,
}

/// Keeps a snapshot collection current from push, falling back to polling
///
/// One driver task per [`start`](Self::start) owns the push channel and
/// the poll timer and is the only writer of the view. It switches sources
/// sequentially: the channel is closed before the first poll and polling
/// stops before a re-opened channel is read.
pub struct LiveDataPolicy {
    source: Arc<dyn SnapshotSource>,
    connector: Arc<dyn Connector>,
    api_base_url: String,
    view: Arc<RwLock<PolicyView>>,
    events_tx: Sender<PolicyEvent>,
    events_rx: Receiver<PolicyEvent>,
    cycle: Option<Cycle>,
}

impl LiveDataPolicy {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        connector: Arc<dyn Connector>,
        api_base_url: impl Into<String>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            source,
            connector,
            api_base_url: api_base_url.into(),
            view: Arc::new(RwLock::new(PolicyView::default())),
            events_tx,
            events_rx,
            cycle: None,
        }
    }

    /// Policy polling `client` and pushing over a real WebSocket
    pub fn from_api(client: ApiClient) -> Self {
        let base = client.base_url().to_string();
        Self::new(Arc::new(client), Arc::new(TungsteniteConnector::new()), base)
    }

    /// Begin a new cycle; any running cycle is stopped first
    ///
    /// Fails before doing anything if `config` is invalid. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self, config: AcquisitionConfig) -> Result<()> {
        config.validate()?;
        let push_url = pushsockets::push_url(&self.api_base_url)?;

        self.stop();

        let feed = SnapshotFeed::new(
            Arc::clone(&self.view),
            Arc::new(AtomicBool::new(true)),
            self.events_tx.clone(),
            config.malformed_frames,
        );
        feed.begin();

        if !config.enabled {
            info!("Live data acquisition disabled");
            feed.deactivate();
            return Ok(());
        }

        info!(
            "Starting live data acquisition (push={} poll={:?})",
            if config.prefer_push { push_url.as_str() } else { "off" },
            config.poll_interval
        );

        let driver = Driver {
            feed: feed.clone(),
            source: Arc::clone(&self.source),
            connector: Arc::clone(&self.connector),
            push_url,
            poll_interval: config.poll_interval,
            prefer_push: config.prefer_push,
            reconnect: config.reconnect.strategy(),
            reconnect_enabled: config.reconnect.is_enabled(),
        };
        let task = tokio::spawn(driver.run());

        self.cycle = Some(Cycle { feed, task });
        Ok(())
    }

    /// Tear down the running cycle. Idempotent.
    ///
    /// Once this returns the view is no longer written, including by
    /// requests that were in flight.
    pub fn stop(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            cycle.feed.deactivate();
            cycle.task.abort();
            info!("Live data acquisition stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.cycle
            .as_ref()
            .map_or(false, |cycle| cycle.feed.is_active() && !cycle.task.is_finished())
    }

    pub fn view(&self) -> PolicyView {
        self.view.read().clone()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.view.read().snapshots.to_vec()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.view.read().state
    }

    pub fn error(&self) -> Option<String> {
        self.view.read().error.clone()
    }

    pub fn try_recv_event(&self) -> Option<PolicyEvent> {
        match self.events_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Receiver for policy events; clones share one queue
    pub fn events(&self) -> Receiver<PolicyEvent> {
        self.events_rx.clone()
    }
}

impl Drop for LiveDataPolicy {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything one cycle's driver task owns
struct Driver {
    feed: SnapshotFeed,
    source: Arc<dyn SnapshotSource>,
    connector: Arc<dyn Connector>,
    push_url: String,
    poll_interval: Duration,
    prefer_push: bool,
    reconnect: Box<dyn ReconnectionStrategy>,
    reconnect_enabled: bool,
}

impl Driver {
    async fn run(self) {
        let mut channel = if self.prefer_push {
            match self.connector.open(&self.push_url).await {
                Ok(channel) => {
                    self.feed.go_live();
                    Some(channel)
                }
                Err(e) => {
                    warn!("Push channel unavailable: {}", e);
                    self.feed.degrade(Some(format!("{}: {}", OPEN_FAILED_MESSAGE, e)));
                    None
                }
            }
        } else {
            info!("Push disabled, polling only");
            self.feed.degrade(None);
            None
        };

        loop {
            if let Some(mut open) = channel.take() {
                let reason = self.read_push(&mut open).await;
                open.close();
                drop(open);
                self.feed.degrade(Some(reason));
            }

            if !self.feed.is_active() {
                return;
            }

            match self.poll_until_reopened().await {
                Some(reopened) => channel = Some(reopened),
                None => return,
            }
        }
    }

    /// Apply push frames until the channel fails; returns the error to show
    async fn read_push(&self, channel: &mut PushChannel) -> String {
        loop {
            match channel.next_event().await {
                Some(ChannelEvent::Frame(message)) => match self.feed.apply_push_message(&message) {
                    PushOutcome::Applied(_) | PushOutcome::Discarded => {}
                    PushOutcome::Fallback(reason) => {
                        return format!("{}: {}", MALFORMED_FRAME_MESSAGE, reason);
                    }
                    PushOutcome::Inactive => return CHANNEL_CLOSED_MESSAGE.to_string(),
                },
                Some(ChannelEvent::Error(reason)) => {
                    warn!("Push channel failed: {}", reason);
                    return CHANNEL_FAILED_MESSAGE.to_string();
                }
                Some(ChannelEvent::Closed(reason)) => {
                    warn!("Push channel closed by server: {:?}", reason);
                    return CHANNEL_CLOSED_MESSAGE.to_string();
                }
                None => {
                    warn!("Push channel ended");
                    return CHANNEL_CLOSED_MESSAGE.to_string();
                }
            }
        }
    }

    /// Poll on the fixed interval, re-opening the channel if configured
    ///
    /// Returns the re-opened channel, or `None` once the cycle is inactive.
    async fn poll_until_reopened(&self) -> Option<PushChannel> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let may_reopen = self.prefer_push && self.reconnect_enabled;
        let mut attempt = 0usize;
        let mut reopen_at = self.next_reopen(may_reopen, attempt);
        let mut opening: Option<OpenFuture<'_>> = None;

        loop {
            if !self.feed.is_active() {
                return None;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.feed.poll_once(self.source.as_ref()).await;
                }
                _ = sleep_until_opt(reopen_at), if reopen_at.is_some() && opening.is_none() => {
                    debug!("Re-opening push channel (attempt {})", attempt + 1);
                    reopen_at = None;
                    opening = Some(self.connector.open(&self.push_url));
                }
                result = poll_opt(&mut opening), if opening.is_some() => {
                    opening = None;
                    match result {
                        Ok(channel) => {
                            if self.feed.restore_live() {
                                return Some(channel);
                            }
                            return None;
                        }
                        Err(e) => {
                            debug!("Push channel re-open failed: {}", e);
                            attempt += 1;
                            reopen_at = self.next_reopen(may_reopen, attempt);
                            if reopen_at.is_none() {
                                info!("Giving up on push channel after {} attempts", attempt);
                            }
                        }
                    }
                }
            }
        }
    }

    fn next_reopen(&self, may_reopen: bool, attempt: usize) -> Option<Instant> {
        if !may_reopen {
            return None;
        }
        self.reconnect
            .next_delay(attempt)
            .map(|delay| Instant::now() + delay)
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn poll_opt(opening: &mut Option<OpenFuture<'_>>) -> pushsockets::Result<PushChannel> {
    match opening.as_mut() {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}
