use std::time::Duration;

/// Trait for deciding when a failed push channel is re-opened
///
/// The consumer keeps its own attempt counter and asks the strategy for the
/// wait before each attempt. Attempt numbers restart at 0 once a channel
/// opens successfully.
pub trait ReconnectionStrategy: Send + Sync {
    /// Get the delay before the next re-open attempt
    ///
    /// # Arguments
    /// * `attempt` - The re-open attempt number (0-indexed)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long, then try again
    /// * `None` - Stop trying
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check if another attempt is allowed
    fn should_reconnect(&self, attempt: usize) -> bool;
}

/// Exponential backoff strategy
///
/// Delays grow as initial_delay * 2^attempt, capped at max_delay
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<usize>,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff strategy
    ///
    /// # Arguments
    /// * `initial_delay` - The delay before the first attempt
    /// * `max_delay` - Upper bound for any single delay
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(initial_delay: Duration, max_delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            initial_delay,
            max_delay,
            max_attempts,
        }
    }
}

impl ReconnectionStrategy for ExponentialBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }

        let factor = 2u64.saturating_pow(attempt.min(32) as u32);
        let delay = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Some(Duration::from_millis(delay.min(self.max_delay.as_millis() as u64)))
    }

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Fixed delay strategy
///
/// Always waits the same amount of time between attempts
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl FixedDelay {
    /// Create a new fixed delay strategy
    ///
    /// # Arguments
    /// * `delay` - The fixed delay between attempts
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self { delay, max_attempts }
    }
}

impl ReconnectionStrategy for FixedDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }
        Some(self.delay)
    }

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Never reconnect strategy
///
/// A failed channel stays failed; polling becomes a permanent downgrade
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectionStrategy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn should_reconnect(&self, _attempt: usize) -> bool {
        false
    }
}
