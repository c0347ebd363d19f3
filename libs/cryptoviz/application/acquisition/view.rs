use crate::domain::{ConnectionState, Snapshot, SnapshotCollection};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Notifications published by the acquisition policy
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyEvent {
    /// A new cycle began; the view was reset
    Started,
    StateChanged {
        from: ConnectionState,
        to: ConnectionState,
    },
    /// The error field went from empty to set
    ErrorRaised(String),
    /// The error field went from set to empty
    ErrorCleared,
}

/// Everything a consumer renders from the policy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyView {
    pub snapshots: SnapshotCollection,
    pub state: ConnectionState,
    pub error: Option<String>,
    pub malformed_frames: u64,
    pub reconnects: u64,
    pub last_update: Option<DateTime<Utc>>,
}

impl PolicyView {
    pub fn snapshots(&self) -> &[Snapshot] {
        self.snapshots.as_slice()
    }

    pub fn get(&self, symbol: &str) -> Option<&Snapshot> {
        self.snapshots.get(symbol)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move along an allowed edge; refused edges leave the state unchanged
    pub(crate) fn transition(&mut self, to: ConnectionState, events: &mut Vec<PolicyEvent>) -> bool {
        let from = self.state;
        if !from.can_transition_to(to) {
            warn!("Refusing connection state transition {} -> {}", from, to);
            return false;
        }
        info!("Connection state {} -> {}", from, to);
        self.state = to;
        events.push(PolicyEvent::StateChanged { from, to });
        true
    }

    /// `degraded -> live` after a channel re-open
    pub(crate) fn restore_live(&mut self, events: &mut Vec<PolicyEvent>) -> bool {
        if self.state != ConnectionState::Degraded {
            warn!("Ignoring push restore while {}", self.state);
            return false;
        }
        self.reconnects += 1;
        info!("Push channel re-opened (reconnect #{})", self.reconnects);
        self.state = ConnectionState::Live;
        events.push(PolicyEvent::StateChanged {
            from: ConnectionState::Degraded,
            to: ConnectionState::Live,
        });
        true
    }

    /// Set or clear the error, emitting only on edges
    pub(crate) fn set_error(&mut self, error: Option<String>, events: &mut Vec<PolicyEvent>) {
        match (&self.error, &error) {
            (None, Some(message)) => events.push(PolicyEvent::ErrorRaised(message.clone())),
            (Some(_), None) => events.push(PolicyEvent::ErrorCleared),
            _ => {}
        }
        self.error = error;
    }

    pub(crate) fn touch(&mut self) {
        self.last_update = Some(Utc::now());
    }
}
