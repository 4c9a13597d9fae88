//! Token bucket pacing for third-party providers
//!
//! Public geocoders publish hard request budgets (Nominatim allows one request
//! per second per client). The limiter tracks one bucket per key, where a key is
//! usually the provider endpoint (`search`, `reverse`).
//!
//! [`RateLimiter::reserve`] always takes a token and returns how long the caller
//! must wait before using it, so callers queue up behind each other instead of
//! failing.
//!
//! # Example
//!
//! ```rust
//! use ridefare_core::rate_limit::{RateLimiter, RateLimitConfig};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_second(1));
//!
//! assert!(limiter.reserve("search").is_zero());
//! assert!(!limiter.reserve("search").is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_second(1)
    }
}

impl RateLimitConfig {
    /// `max_requests` per window, with no allowance beyond it
    #[must_use]
    pub fn strict(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window }
    }

    /// Per-second rate limit, the shape provider usage policies ask for
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self::strict(max, Duration::from_secs(1))
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests)
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64()
    }
}

/// Token bucket state
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
    config: RateLimitConfig,
}

impl TokenBucket {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            tokens: config.capacity(),
            last_update: Instant::now(),
            config,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        let new_tokens = elapsed.as_secs_f64() * self.config.refill_rate();

        self.tokens = (self.tokens + new_tokens).min(self.config.capacity());
        self.last_update = now;
    }

    // Tokens may go negative; the deficit is the queue of callers already waiting.
    fn reserve(&mut self) -> Duration {
        self.refill();
        self.tokens -= 1.0;

        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.config.refill_rate())
        }
    }
}

/// Rate limiter with one bucket per key
pub struct RateLimiter {
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    default_config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            default_config: config,
        }
    }

    fn with_bucket<R>(&self, key: &str, f: impl FnOnce(&mut TokenBucket) -> R) -> R {
        // A poisoned lock still guards valid bucket data
        let mut buckets = self.buckets.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.default_config.clone()));
        f(bucket)
    }

    /// Take a token for the given key and return how long to wait before using it
    #[must_use]
    pub fn reserve(&self, key: &str) -> Duration {
        self.with_bucket(key, TokenBucket::reserve)
    }

    /// Reset rate limit for a key
    pub fn reset(&self, key: &str) {
        let mut buckets = self.buckets.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        buckets.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window_passes_without_waiting() {
        let limiter = RateLimiter::new(RateLimitConfig::strict(3, Duration::from_secs(1)));

        assert!(limiter.reserve("search").is_zero());
        assert!(limiter.reserve("search").is_zero());
        assert!(limiter.reserve("search").is_zero());
        assert!(!limiter.reserve("search").is_zero());
    }

    #[test]
    fn test_rate_limiter_different_keys() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert!(limiter.reserve("search").is_zero());
        assert!(!limiter.reserve("search").is_zero());
        assert!(limiter.reserve("reverse").is_zero());
    }

    #[test]
    fn test_reserve_queues_callers() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert_eq!(limiter.reserve("search"), Duration::ZERO);

        let second = limiter.reserve("search");
        assert!(second > Duration::from_millis(900), "second wait: {second:?}");
        assert!(second <= Duration::from_secs(1));

        let third = limiter.reserve("search");
        assert!(third > Duration::from_millis(1900), "third wait: {third:?}");
    }

    #[test]
    fn test_rate_limiter_reset() {
        let limiter = RateLimiter::new(RateLimitConfig::per_second(1));

        assert!(limiter.reserve("search").is_zero());
        assert!(!limiter.reserve("search").is_zero());

        limiter.reset("search");
        assert!(limiter.reserve("search").is_zero());
    }
}
