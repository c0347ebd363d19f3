//! Periodic status line for the watch binary

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Decides when the next status line is due
pub struct Heartbeat {
    interval: Duration,
    last_beat: DateTime<Utc>,
    beats: u64,
}

impl Heartbeat {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            last_beat: Utc::now(),
            beats: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn should_beat(&self) -> bool {
        self.elapsed() >= self.interval
    }

    /// Record a beat now and return the running count
    pub fn beat(&mut self) -> u64 {
        self.last_beat = Utc::now();
        self.beats += 1;
        self.beats
    }

    /// Time since the last beat; zero if the clock went backwards
    pub fn elapsed(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.last_beat)
            .to_std()
            .unwrap_or_default()
    }

    pub fn count(&self) -> u64 {
        self.beats
    }
}
