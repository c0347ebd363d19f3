//! Push channel handle
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                         ┌──────────────────┐
//! │  Transport task  │  ChannelFeed            │  Consumer        │
//! │  (socket owner)  │ ──── unbounded mpsc ──> │  PushChannel     │
//! │                  │ <─── close signal ───── │  next_event()    │
//! └──────────────────┘                         └──────────────────┘
//! ```
//!
//! The consumer owns the [`PushChannel`]; the transport owns the matching
//! [`ChannelFeed`]. Closing or dropping the channel raises the close signal,
//! and the transport is expected to shut its socket down when it sees it.
//! When the transport drops its feed the channel reports end of stream.

use crate::core::event::ChannelEvent;
use crate::traits::{PushSocketError, Result, WsMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tracing::debug;

/// Consumer side of a push channel
pub struct PushChannel {
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    open: Arc<AtomicBool>,
    close_signal: Arc<Notify>,
}

/// Transport side of a push channel
///
/// Used by connectors to deliver events. Custom connectors (including test
/// doubles) build a pair with [`PushChannel::pair`] and keep the feed.
pub struct ChannelFeed {
    events: mpsc::UnboundedSender<ChannelEvent>,
    open: Arc<AtomicBool>,
    close_signal: Arc<Notify>,
}

impl PushChannel {
    /// Create a connected channel/feed pair
    pub fn pair() -> (PushChannel, ChannelFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(true));
        let close_signal = Arc::new(Notify::new());

        let channel = PushChannel {
            events: rx,
            open: Arc::clone(&open),
            close_signal: Arc::clone(&close_signal),
        };
        let feed = ChannelFeed {
            events: tx,
            open,
            close_signal,
        };

        (channel, feed)
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the channel has been closed locally or the
    /// transport has gone away.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        if !self.is_open() {
            return None;
        }
        self.events.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_next_event(&mut self) -> Option<ChannelEvent> {
        if !self.is_open() {
            return None;
        }
        self.events.try_recv().ok()
    }

    /// Check whether the channel has not been closed locally
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Close the channel. Idempotent.
    pub fn close(&mut self) {
        if self.open.swap(false, Ordering::AcqRel) {
            debug!("Closing push channel");
            self.close_signal.notify_one();
        }
        self.events.close();
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl ChannelFeed {
    /// Deliver an event to the consumer
    pub fn send(&self, event: ChannelEvent) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(PushSocketError::ChannelSend("channel closed by consumer".into()));
        }
        self.events
            .send(event)
            .map_err(|e| PushSocketError::ChannelSend(e.to_string()))
    }

    /// Deliver a frame
    pub fn frame(&self, message: impl Into<WsMessage>) -> Result<()> {
        self.send(ChannelEvent::Frame(message.into()))
    }

    /// Report a transport error
    pub fn error(&self, reason: impl Into<String>) -> Result<()> {
        self.send(ChannelEvent::Error(reason.into()))
    }

    /// Report that the remote side closed the connection
    pub fn closed_by_remote(&self, reason: Option<String>) -> Result<()> {
        self.send(ChannelEvent::Closed(reason))
    }

    /// Check whether the consumer has closed or dropped the channel
    pub fn is_closed(&self) -> bool {
        !self.open.load(Ordering::Acquire) || self.events.is_closed()
    }

    /// Resolve once the consumer closes the channel
    pub async fn closed(&self) {
        if self.is_closed() {
            return;
        }
        self.close_signal.notified().await;
    }
}
