//! Integration tests for reconnection strategies
//!
//! These tests verify the retry schedules handed to push channel consumers.

use pushsockets::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
use std::time::Duration;

/// Macro for verbose test output
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

#[test]
fn test_exponential_backoff_full_sequence() {
    let strategy = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10), Some(5));

    let expected_delays = [100, 200, 400, 800, 1600];

    for (attempt, &expected_ms) in expected_delays.iter().enumerate() {
        let delay = strategy.next_delay(attempt).unwrap();
        verbose_println!("  Attempt {}: {:?}", attempt, delay);
        assert_eq!(delay.as_millis(), expected_ms, "Unexpected delay at attempt {}", attempt);
    }

    assert!(strategy.next_delay(5).is_none(), "Should return None after max attempts");
}

#[test]
fn test_exponential_backoff_with_capping() {
    let strategy = ExponentialBackoff::new(Duration::from_millis(500), Duration::from_secs(2), None);

    let delays: Vec<u64> = (0..6)
        .map(|i| strategy.next_delay(i).unwrap().as_millis() as u64)
        .collect();

    verbose_println!("  Delays: {:?}", delays);
    assert_eq!(delays, vec![500, 1000, 2000, 2000, 2000, 2000]);
}

#[test]
fn test_exponential_backoff_huge_attempt_does_not_overflow() {
    let strategy = ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(30), None);
    assert_eq!(strategy.next_delay(10_000), Some(Duration::from_secs(30)));
}

#[test]
fn test_fixed_delay_consistency() {
    let strategy = FixedDelay::new(Duration::from_millis(250), Some(3));

    for attempt in 0..3 {
        assert_eq!(strategy.next_delay(attempt), Some(Duration::from_millis(250)));
    }
    assert!(!strategy.should_reconnect(3));
    assert_eq!(strategy.next_delay(3), None);
}

#[test]
fn test_never_reconnect() {
    let strategy = NeverReconnect;
    assert!(!strategy.should_reconnect(0));
    assert_eq!(strategy.next_delay(0), None);
}

#[test]
fn test_strategies_as_trait_objects() {
    let strategies: Vec<Box<dyn ReconnectionStrategy>> = vec![
        Box::new(NeverReconnect),
        Box::new(FixedDelay::new(Duration::from_secs(1), None)),
        Box::new(ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(8), None)),
    ];

    let first: Vec<Option<Duration>> = strategies.iter().map(|s| s.next_delay(0)).collect();
    assert_eq!(
        first,
        vec![None, Some(Duration::from_secs(1)), Some(Duration::from_secs(1))]
    );
}
