//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Lowest `pricing.min_fare` accepted; segments are never priced below it
pub const MIN_FARE_FLOOR: i64 = 50;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderSection,

    /// Place search and ranking settings
    #[serde(default)]
    pub search: SearchSection,

    /// Fare allocation settings
    #[serde(default)]
    pub pricing: PricingSection,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl ConfigSchema {
    /// Check values that parse fine but cannot be used
    ///
    /// # Errors
    /// Returns an [`crate::ErrorCode::InvalidConfigValue`] error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.geocoder.limit == 0 {
            return Err(Error::invalid_config("geocoder.limit must be at least 1"));
        }
        if self.geocoder.requests_per_second == 0 {
            return Err(Error::invalid_config("geocoder.requests_per_second must be at least 1"));
        }
        if self.geocoder.timeout_secs == 0 {
            return Err(Error::invalid_config("geocoder.timeout_secs cannot be zero"));
        }
        if self.search.max_suggestions == 0 {
            return Err(Error::invalid_config("search.max_suggestions must be at least 1"));
        }
        if !self.search.min_score.is_finite() || self.search.min_score < 0.0 {
            return Err(Error::invalid_config("search.min_score must be a non-negative number"));
        }
        if self.pricing.min_fare < MIN_FARE_FLOOR {
            return Err(Error::invalid_config(format!(
                "pricing.min_fare cannot be below {MIN_FARE_FLOOR}, got {}",
                self.pricing.min_fare
            )));
        }
        Ok(())
    }
}

/// Geocoding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderSection {
    /// Provider base URL, without the `/search` or `/reverse` path
    pub base_url: String,
    /// Client-identifying `User-Agent`, required by the provider's usage policy
    pub user_agent: String,
    /// Comma separated ISO country codes results are restricted to
    pub country_codes: String,
    /// Maximum candidates requested per search
    pub limit: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Request budget agreed with the provider
    pub requests_per_second: u32,
}

impl Default for GeocoderSection {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("ridefare/", env!("CARGO_PKG_VERSION")).to_string(),
            country_codes: "in".to_string(),
            limit: 8,
            timeout_secs: 10,
            requests_per_second: 1,
        }
    }
}

/// Place search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Queries shorter than this never reach the provider
    pub min_query_chars: usize,
    /// Quiet period after the last keystroke before a search fires
    pub debounce_ms: u64,
    /// Pause before the single retry with the normalized query
    pub retry_pause_ms: u64,
    /// Candidates scoring below this are dropped
    pub min_score: f64,
    /// Maximum suggestions shown
    pub max_suggestions: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            debounce_ms: 400,
            retry_pause_ms: 500,
            min_score: 30.0,
            max_suggestions: 7,
        }
    }
}

/// Fare allocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    /// Smallest fare any stopover segment may carry
    pub min_fare: i64,
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            min_fare: MIN_FARE_FLOOR,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySection {
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
