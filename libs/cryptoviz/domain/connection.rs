use serde::{Deserialize, Serialize};
use std::fmt;

/// Which source currently feeds the snapshot collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Initial state, before the push channel has opened or failed
    #[default]
    Connecting,
    /// Push channel open and authoritative
    Live,
    /// Polling is the active source
    Degraded,
}

impl ConnectionState {
    /// Edges a running cycle may take on its own
    ///
    /// `Degraded -> Live` is not among them: leaving degraded requires a
    /// fresh start or an explicitly configured re-open.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        matches!(
            (self, next),
            (ConnectionState::Connecting, ConnectionState::Live)
                | (ConnectionState::Connecting, ConnectionState::Degraded)
                | (ConnectionState::Live, ConnectionState::Degraded)
        )
    }

    pub fn is_live(self) -> bool {
        self == ConnectionState::Live
    }

    pub fn is_degraded(self) -> bool {
        self == ConnectionState::Degraded
    }

    /// Short label for status indicators
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Live => "live",
            ConnectionState::Degraded => "polling",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
