//! Error types for geocoding and place suggestions

use ridefare_core::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for geocoder operations
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Geocoder errors
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Query too short to be worth a provider round trip
    #[error("Query must be at least {min_chars} characters")]
    InputEmpty {
        /// Minimum accepted length
        min_chars: usize,
    },

    /// Provider answered 429, or an earlier 429 cooldown is still running
    #[error("Geocoder rate limited{}", retry_suffix(.retry_after))]
    RateLimited {
        /// How long the provider asked us to stay away, when known
        retry_after: Option<Duration>,
    },

    /// Provider answered with a non-success status
    #[error("Geocoder unavailable ({status}): {message}")]
    ProviderUnavailable {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// Network failure or timeout before any status was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Malformed geocoder response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[allow(clippy::ref_option)]
fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(", retry after {}ms", d.as_millis()))
        .unwrap_or_default()
}

impl GeocodeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider error from a response status and body
    pub fn unavailable(status: u16, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            status,
            message: message.into(),
        }
    }

    /// Check if the provider throttled us
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Check if the provider could not be reached or failed to answer properly
    #[must_use]
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::Request(_) | Self::Decode(_)
        )
    }

    /// Stable code for logs and exit statuses
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InputEmpty { .. } => ErrorCode::InputEmpty,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::ProviderUnavailable { .. } => ErrorCode::ProviderUnavailable,
            Self::Request(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Request(_) => ErrorCode::ProviderUnavailable,
            Self::Decode(_) => ErrorCode::MalformedResponse,
            Self::Config(_) => ErrorCode::InvalidConfigValue,
        }
    }
}

impl From<GeocodeError> for ridefare_core::Error {
    fn from(err: GeocodeError) -> Self {
        let code = err.code();
        let message = err.to_string();
        let converted = ridefare_core::Error::geocoder(code, message);
        match err {
            GeocodeError::RateLimited { .. } => converted
                .with_suggestion("Wait a few seconds; the provider allows one request per second"),
            GeocodeError::InputEmpty { .. } => {
                converted.with_suggestion("Type at least two characters of the place name")
            }
            GeocodeError::Request(source) => converted.with_source(source),
            GeocodeError::Decode(source) => converted.with_source(source),
            _ => converted,
        }
    }
}
