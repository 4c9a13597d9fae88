//! Configuration for the geocoding client
//!
//! Built from the `[geocoder]` section of `ridefare.toml`, with a few
//! environment overrides for pointing at a self-hosted provider.

use crate::error::{GeocodeError, GeocodeResult};
use ridefare_core::config::GeocoderSection;
use ridefare_core::rate_limit::RateLimitConfig;
use ridefare_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Provider base URL override
pub const ENV_BASE_URL: &str = "RIDEFARE_GEOCODER_URL";
/// `User-Agent` override
pub const ENV_USER_AGENT: &str = "RIDEFARE_USER_AGENT";
/// Request timeout override, in seconds
pub const ENV_TIMEOUT_SECS: &str = "RIDEFARE_TIMEOUT_SECS";

/// Geocoding client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Provider base URL, without the `/search` or `/reverse` path
    pub base_url: String,
    /// Client-identifying `User-Agent` sent with every request
    pub user_agent: String,
    /// Comma separated ISO country codes; empty searches worldwide
    pub country_codes: String,
    /// Maximum candidates requested per search
    pub limit: u32,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Request pacing; requests wait for a token instead of failing
    pub rate_limit: RateLimitConfig,
    /// Backoff applied after consecutive 429 responses
    pub cooldown: RetryConfig,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::from_section(&GeocoderSection::default())
    }
}

impl GeocoderConfig {
    /// Build from the `[geocoder]` config section
    #[must_use]
    pub fn from_section(section: &GeocoderSection) -> Self {
        Self {
            base_url: section.base_url.clone(),
            user_agent: section.user_agent.clone(),
            country_codes: section.country_codes.clone(),
            limit: section.limit,
            timeout: Duration::from_secs(section.timeout_secs),
            rate_limit: RateLimitConfig::per_second(section.requests_per_second),
            cooldown: RetryConfig::throttled(),
        }
    }

    /// Defaults with environment overrides applied
    ///
    /// Reads the following environment variables:
    /// - `RIDEFARE_GEOCODER_URL`: provider base URL
    /// - `RIDEFARE_USER_AGENT`: `User-Agent` header
    /// - `RIDEFARE_TIMEOUT_SECS`: request timeout in seconds
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Ok(agent) = env::var(ENV_USER_AGENT) {
            self.user_agent = agent;
        }
        if let Some(secs) = env::var(ENV_TIMEOUT_SECS).ok().and_then(|s| s.parse().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the `User-Agent`
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Builder-style method to restrict results to some countries
    #[must_use]
    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = codes.into();
        self
    }

    /// Builder-style method to set the result limit
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Builder-style method to set the 429 backoff
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: RetryConfig) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns [`GeocodeError::Config`] naming the unusable value.
    pub fn validate(&self) -> GeocodeResult<()> {
        if self.base_url.is_empty() {
            return Err(GeocodeError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(GeocodeError::config("base_url must start with http:// or https://"));
        }

        // The public provider rejects anonymous clients
        if self.user_agent.trim().is_empty() {
            return Err(GeocodeError::config("user_agent cannot be empty"));
        }

        if self.limit == 0 {
            return Err(GeocodeError::config("limit must be at least 1"));
        }

        if self.timeout.is_zero() {
            return Err(GeocodeError::config("timeout cannot be zero"));
        }

        if self.rate_limit.max_requests == 0 || self.rate_limit.window.is_zero() {
            return Err(GeocodeError::config("rate limit must allow at least one request per window"));
        }

        Ok(())
    }
}
