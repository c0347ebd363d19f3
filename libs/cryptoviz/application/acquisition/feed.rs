//! Guarded writes into the policy view
//!
//! A [`SnapshotFeed`] belongs to one start cycle. Every write takes the view's
//! write lock and checks the cycle's active flag first, so once the cycle is
//! deactivated nothing it still has in flight can touch the view.

use super::config::MalformedFramePolicy;
use super::ports::SnapshotSource;
use super::view::{PolicyEvent, PolicyView};
use crate::domain::{ConnectionState, Snapshot};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use pushsockets::{FrameDecoder, JsonFrameDecoder, WsMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub const OPEN_FAILED_MESSAGE: &str = "WebSocket not available, using polling";
pub const CHANNEL_FAILED_MESSAGE: &str = "WebSocket connection failed, falling back to polling";
pub const CHANNEL_CLOSED_MESSAGE: &str = "WebSocket connection closed, falling back to polling";
pub const MALFORMED_FRAME_MESSAGE: &str = "Malformed push frame, falling back to polling";

/// Result of applying one push frame
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Upserted; `true` when the symbol was new
    Applied(bool),
    /// Undecodable frame discarded
    Discarded,
    /// Undecodable frame that should end the push phase
    Fallback(String),
    /// The cycle is no longer active
    Inactive,
}

#[derive(Clone)]
pub struct SnapshotFeed {
    view: Arc<RwLock<PolicyView>>,
    active: Arc<AtomicBool>,
    events: Sender<PolicyEvent>,
    decoder: Arc<JsonFrameDecoder<Snapshot>>,
    malformed_frames: MalformedFramePolicy,
}

impl SnapshotFeed {
    pub(crate) fn new(
        view: Arc<RwLock<PolicyView>>,
        active: Arc<AtomicBool>,
        events: Sender<PolicyEvent>,
        malformed_frames: MalformedFramePolicy,
    ) -> Self {
        Self {
            view,
            active,
            events,
            decoder: Arc::new(JsonFrameDecoder::new()),
            malformed_frames,
        }
    }

    /// A feed with its own view and event channel
    pub fn standalone(malformed_frames: MalformedFramePolicy) -> (Self, Receiver<PolicyEvent>) {
        let (tx, rx) = unbounded();
        let feed = Self::new(
            Arc::new(RwLock::new(PolicyView::default())),
            Arc::new(AtomicBool::new(true)),
            tx,
            malformed_frames,
        );
        (feed, rx)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop accepting writes; returns once no write is in progress
    pub fn deactivate(&self) {
        let _guard = self.view.write();
        self.active.store(false, Ordering::Release);
    }

    pub fn view(&self) -> PolicyView {
        self.view.read().clone()
    }

    /// Run `f` against the view if the cycle is still active
    ///
    /// Events produced by `f` are published before the lock is released.
    fn write<R>(&self, f: impl FnOnce(&mut PolicyView, &mut Vec<PolicyEvent>) -> R) -> Option<R> {
        let mut view = self.view.write();
        if !self.active.load(Ordering::Acquire) {
            return None;
        }
        let mut events = Vec::new();
        let result = f(&mut view, &mut events);
        for event in events {
            // Nobody listening is fine
            let _ = self.events.send(event);
        }
        Some(result)
    }

    /// Decode one push frame and upsert it
    pub fn apply_push_message(&self, message: &WsMessage) -> PushOutcome {
        match self.decoder.decode(message) {
            Ok(snapshot) => {
                debug!("Push update for {} at {}", snapshot.symbol, snapshot.price);
                self.write(|view, _| {
                    view.touch();
                    view.snapshots.upsert(snapshot)
                })
                .map_or(PushOutcome::Inactive, PushOutcome::Applied)
            }
            Err(e) => match self.malformed_frames {
                MalformedFramePolicy::Drop => {
                    debug!("Dropping malformed push frame: {}", e);
                    if self.is_active() {
                        PushOutcome::Discarded
                    } else {
                        PushOutcome::Inactive
                    }
                }
                MalformedFramePolicy::Count => {
                    debug!("Counting malformed push frame: {}", e);
                    self.write(|view, _| view.malformed_frames += 1)
                        .map_or(PushOutcome::Inactive, |_| PushOutcome::Discarded)
                }
                MalformedFramePolicy::Fallback => {
                    warn!("Malformed push frame: {}", e);
                    PushOutcome::Fallback(e.to_string())
                }
            },
        }
    }

    /// Fetch the full list and replace the collection
    ///
    /// On failure the collection is left untouched and the error recorded.
    /// Returns whether the fetch succeeded.
    pub async fn poll_once(&self, source: &dyn SnapshotSource) -> bool {
        let result = source.fetch_snapshots().await;

        self.write(|view, events| match result {
            Ok(snapshots) => {
                debug!("Poll returned {} snapshots", snapshots.len());
                view.snapshots.replace_all(snapshots);
                view.touch();
                view.set_error(None, events);
                true
            }
            Err(e) => {
                warn!("Poll failed: {}", e);
                view.set_error(Some(e.to_string()), events);
                false
            }
        })
        .unwrap_or(false)
    }

    /// Reset the view for a new cycle
    pub(crate) fn begin(&self) {
        self.write(|view, events| {
            view.reset();
            events.push(PolicyEvent::Started);
        });
    }

    /// Push channel open: `connecting -> live`, error cleared
    pub(crate) fn go_live(&self) -> bool {
        self.write(|view, events| {
            let moved = view.transition(ConnectionState::Live, events);
            if moved {
                view.set_error(None, events);
            }
            moved
        })
        .unwrap_or(false)
    }

    /// Enter `degraded`, recording `error` if given
    pub(crate) fn degrade(&self, error: Option<String>) -> bool {
        self.write(|view, events| {
            let moved = view.transition(ConnectionState::Degraded, events);
            if let Some(message) = error {
                view.set_error(Some(message), events);
            }
            moved
        })
        .unwrap_or(false)
    }

    /// Re-opened push channel: `degraded -> live`, error cleared
    pub(crate) fn restore_live(&self) -> bool {
        self.write(|view, events| {
            let moved = view.restore_live(events);
            if moved {
                view.set_error(None, events);
            }
            moved
        })
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ApiError;
    use async_trait::async_trait;

    struct Fixed(Result<Vec<Snapshot>, ApiError>);

    #[async_trait]
    impl SnapshotSource for Fixed {
        async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>, ApiError> {
            self.0.clone()
        }
    }

    fn frame(symbol: &str, price: f64) -> WsMessage {
        WsMessage::from(format!(
            r#"{{"symbol":"{}","price":{},"trend":"up","timestamp":1770339815}}"#,
            symbol, price
        ))
    }

    #[test]
    fn test_push_sequence_upserts_by_symbol() {
        let (feed, _events) = SnapshotFeed::standalone(MalformedFramePolicy::Drop);

        assert_eq!(feed.apply_push_message(&frame("BTC", 10.0)), PushOutcome::Applied(true));
        assert_eq!(feed.apply_push_message(&frame("ETH", 2.0)), PushOutcome::Applied(true));
        assert_eq!(feed.apply_push_message(&frame("BTC", 12.0)), PushOutcome::Applied(false));

        let view = feed.view();
        assert_eq!(view.snapshots.len(), 2);
        assert_eq!(view.get("BTC").unwrap().price, 12.0);
        assert!(view.last_update.is_some());
    }

    #[test]
    fn test_malformed_frame_policies() {
        let bad = WsMessage::from("not json");

        let (drop_feed, _rx) = SnapshotFeed::standalone(MalformedFramePolicy::Drop);
        assert_eq!(drop_feed.apply_push_message(&bad), PushOutcome::Discarded);
        assert_eq!(drop_feed.view().malformed_frames, 0);

        let (count_feed, _rx) = SnapshotFeed::standalone(MalformedFramePolicy::Count);
        count_feed.apply_push_message(&bad);
        count_feed.apply_push_message(&WsMessage::from(r#"{"price":1}"#));
        assert_eq!(count_feed.view().malformed_frames, 2);
        assert!(count_feed.view().snapshots.is_empty());

        let (fallback_feed, _rx) = SnapshotFeed::standalone(MalformedFramePolicy::Fallback);
        assert!(matches!(fallback_feed.apply_push_message(&bad), PushOutcome::Fallback(_)));
    }

    #[test]
    fn test_binary_frames_decode() {
        let (feed, _rx) = SnapshotFeed::standalone(MalformedFramePolicy::Drop);
        let message = WsMessage::Binary(br#"{"symbol":"SOL","price":150.0,"timestamp":"2026-02-06T01:03:35Z"}"#.to_vec());
        assert_eq!(feed.apply_push_message(&message), PushOutcome::Applied(true));
    }

    #[tokio::test]
    async fn test_failed_poll_leaves_collection() {
        let (feed, events) = SnapshotFeed::standalone(MalformedFramePolicy::Drop);
        feed.apply_push_message(&frame("BTC", 10.0));

        let failing = Fixed(Err(ApiError::Status {
            status: 500,
            reason: "Internal Server Error".into(),
        }));
        assert!(!feed.poll_once(&failing).await);
        assert!(!feed.poll_once(&failing).await);

        let view = feed.view();
        assert_eq!(view.snapshots.len(), 1);
        assert_eq!(view.error.as_deref(), Some("API Error: Internal Server Error"));
        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![PolicyEvent::ErrorRaised("API Error: Internal Server Error".into())]
        );
    }

    #[tokio::test]
    async fn test_successful_poll_replaces_and_clears_error() {
        let (feed, events) = SnapshotFeed::standalone(MalformedFramePolicy::Drop);
        feed.apply_push_message(&frame("DOGE", 0.1));
        feed.poll_once(&Fixed(Err(ApiError::Transport("refused".into())))).await;

        let rows: Vec<Snapshot> = serde_json::from_str(
            r#"[{"symbol":"BTC","price":1,"updated_at":"2026-02-06T01:03:35Z"},
                {"symbol":"ETH","price":2,"updated_at":"2026-02-06T01:03:35Z"}]"#,
        )
        .unwrap();
        assert!(feed.poll_once(&Fixed(Ok(rows))).await);

        let view = feed.view();
        assert_eq!(view.snapshots.symbols().collect::<Vec<_>>(), vec!["BTC", "ETH"]);
        assert_eq!(view.error, None);
        assert_eq!(events.try_iter().last(), Some(PolicyEvent::ErrorCleared));
    }

    #[tokio::test]
    async fn test_no_writes_after_deactivate() {
        let (feed, events) = SnapshotFeed::standalone(MalformedFramePolicy::Count);
        feed.deactivate();

        assert_eq!(feed.apply_push_message(&frame("BTC", 1.0)), PushOutcome::Inactive);
        assert_eq!(feed.apply_push_message(&WsMessage::from("junk")), PushOutcome::Inactive);
        assert!(!feed.poll_once(&Fixed(Err(ApiError::Transport("x".into())))).await);
        assert!(!feed.degrade(Some("x".into())));

        assert_eq!(feed.view(), PolicyView::default());
        assert!(events.try_recv().is_err());
    }
}
