use crate::infrastructure::config::AcquisitionSection;
pub use crate::infrastructure::config::{MalformedFramePolicy, ReconnectPolicy};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    #[error("Invalid acquisition config: {0}")]
    InvalidConfig(String),

    #[error("Invalid push address: {0}")]
    InvalidUrl(#[from] pushsockets::PushSocketError),
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;

/// Options for one start cycle of the acquisition policy
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// When false the policy stays idle in `connecting`
    pub enabled: bool,
    pub poll_interval: Duration,
    /// When false polling starts immediately, with no error recorded
    pub prefer_push: bool,
    pub malformed_frames: MalformedFramePolicy,
    pub reconnect: ReconnectPolicy,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            prefer_push: true,
            malformed_frames: MalformedFramePolicy::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl AcquisitionConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_prefer_push(mut self, prefer_push: bool) -> Self {
        self.prefer_push = prefer_push;
        self
    }

    pub fn with_malformed_frames(mut self, policy: MalformedFramePolicy) -> Self {
        self.malformed_frames = policy;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(AcquisitionError::InvalidConfig(
                "poll interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&AcquisitionSection> for AcquisitionConfig {
    fn from(section: &AcquisitionSection) -> Self {
        Self {
            enabled: section.enabled,
            poll_interval: Duration::from_millis(section.poll_interval_ms),
            prefer_push: section.prefer_push,
            malformed_frames: section.malformed_frames,
            reconnect: section.reconnect.clone(),
        }
    }
}
