//! Test doubles for the acquisition policy
//!
//! [`ScriptedConnector`] answers each `open` from a script and hands the
//! transport side of every opened channel to the test. [`FakeSource`]
//! replays scripted poll results.

#![allow(dead_code)]

use async_trait::async_trait;
use cryptoviz::domain::{Snapshot, Timestamp};
use cryptoviz::infrastructure::ApiError;
use cryptoviz::SnapshotSource;
use parking_lot::Mutex;
use pushsockets::{ChannelFeed, Connector, PushChannel, PushSocketError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://backend.test:8000";

pub fn snap(symbol: &str, price: f64) -> Snapshot {
    Snapshot {
        symbol: symbol.to_string(),
        price,
        moving_average: None,
        trend: None,
        timestamp: Timestamp::Epoch(1_770_339_815.0),
        market_cap: None,
        volume_24h: None,
    }
}

pub fn frame(symbol: &str, price: f64) -> String {
    format!(
        r#"{{"symbol":"{}","price":{},"movingAverage":{},"trend":"up","timestamp":1770339815}}"#,
        symbol, price, price
    )
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        reason: "Internal Server Error".to_string(),
    }
}

#[derive(Debug, Clone)]
pub enum OpenScript {
    Accept,
    Refuse(String),
}

pub struct ScriptedConnector {
    script: Mutex<VecDeque<OpenScript>>,
    opens: AtomicUsize,
    urls: Mutex<Vec<String>>,
    feeds: mpsc::UnboundedSender<ChannelFeed>,
}

impl ScriptedConnector {
    /// Connector plus the receiver of every accepted channel's feed
    ///
    /// Once the script runs out every further open is refused.
    pub fn new(script: Vec<OpenScript>) -> (Arc<Self>, mpsc::UnboundedReceiver<ChannelFeed>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            script: Mutex::new(script.into()),
            opens: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            feeds: tx,
        });
        (connector, rx)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn open(&self, url: &str) -> pushsockets::Result<PushChannel> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());

        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| OpenScript::Refuse("script exhausted".to_string()));

        match step {
            OpenScript::Accept => {
                let (channel, feed) = PushChannel::pair();
                let _ = self.feeds.send(feed);
                Ok(channel)
            }
            OpenScript::Refuse(reason) => Err(PushSocketError::WebSocket(reason)),
        }
    }
}

pub struct FakeSource {
    script: Mutex<VecDeque<Result<Vec<Snapshot>, ApiError>>>,
    fallback: Mutex<Result<Vec<Snapshot>, ApiError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeSource {
    /// Answers every poll with `result`
    pub fn always(result: Result<Vec<Snapshot>, ApiError>) -> Arc<Self> {
        Self::scripted(Vec::new(), result)
    }

    /// Answers from `script` in order, then with `fallback` forever
    pub fn scripted(
        script: Vec<Result<Vec<Snapshot>, ApiError>>,
        fallback: Result<Vec<Snapshot>, ApiError>,
    ) -> Arc<Self> {
        Self::build(script, fallback, Duration::ZERO)
    }

    /// Like [`FakeSource::always`] but each response takes `delay`
    pub fn slow(result: Result<Vec<Snapshot>, ApiError>, delay: Duration) -> Arc<Self> {
        Self::build(Vec::new(), result, delay)
    }

    fn build(
        script: Vec<Result<Vec<Snapshot>, ApiError>>,
        fallback: Result<Vec<Snapshot>, ApiError>,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback: Mutex::new(fallback),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for FakeSource {
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.lock().clone())
    }
}

/// Let spawned tasks run; with paused time this also advances the clock
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// The snapshot [`frame`] decodes to
pub fn snap_from_frame(symbol: &str, price: f64) -> Snapshot {
    Snapshot {
        moving_average: Some(price),
        trend: Some(cryptoviz::Trend::Up),
        ..snap(symbol, price)
    }
}
