//! Exponential backoff delays
//!
//! Used to decide how long to stay away from a provider that keeps answering
//! "too many requests". The geocoder client never retries a throttled request on
//! its own; it records a cooldown of `delay_for_attempt(n)` after the n-th
//! consecutive 429 and fails fast until the cooldown has passed.
//!
//! # Example
//!
//! ```rust
//! use ridefare_core::retry::RetryConfig;
//! use std::time::Duration;
//!
//! let config = RetryConfig::throttled().without_jitter();
//! assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
//! assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay after the first failure
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Backoff for providers that answered 429: starts at one second, caps at a minute
    #[must_use]
    pub fn throttled() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }

    /// Same config with jitter disabled, for deterministic delays
    #[must_use]
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Calculate delay for a given attempt (attempt 0 never waits)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let delay_secs = base_delay.min(self.max_delay.as_secs_f64());

        let final_delay = if self.jitter {
            // Up to 25% extra
            delay_secs * (1.0 + rand_simple() * 0.25)
        } else {
            delay_secs
        };

        Duration::from_secs_f64(final_delay)
    }
}

/// Simple pseudo-random number generator (0.0 to 1.0)
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn rand_simple() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(nanos);
    (hasher.finish() % 1000) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: false,
            ..Default::default()
        };

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_throttled_caps_at_max_delay() {
        let config = RetryConfig::throttled().without_jitter();
        assert_eq!(config.delay_for_attempt(20), Duration::from_secs(60));
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig::throttled();
        for attempt in 1..5 {
            let plain = config.clone().without_jitter().delay_for_attempt(attempt);
            let jittered = config.delay_for_attempt(attempt);
            assert!(jittered >= plain);
            assert!(jittered <= plain.mul_f64(1.25));
        }
    }
}
