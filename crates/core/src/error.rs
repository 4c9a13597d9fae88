//! Structured error handling with codes, context and recovery suggestions
//!
//! Every crate in the workspace keeps its own `thiserror` enum for the failures
//! it can produce; this type is where those end up when they reach a binary or
//! need a stable numeric code for logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Unclassified failure
    Unknown = 1000,
    /// Operation exceeded its time budget
    Timeout = 1003,

    // IO errors (2xxx)
    /// Generic IO failure
    IoError = 2000,
    /// File does not exist
    FileNotFound = 2001,
    /// File exists but cannot be read
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    /// Generic configuration failure
    ConfigError = 3000,
    /// Explicit configuration path does not exist
    ConfigNotFound = 3001,
    /// Configuration could not be parsed
    ConfigParseError = 3002,
    /// Configuration parsed but holds unusable values
    InvalidConfigValue = 3004,

    // Geocoder errors (4xxx)
    /// Generic geocoder failure
    GeocoderError = 4000,
    /// Query too short to send to the provider
    InputEmpty = 4001,
    /// Provider unreachable or answered with a non-success status
    ProviderUnavailable = 4002,
    /// Provider answered 429
    RateLimited = 4003,
    /// Provider answered with a body that could not be decoded
    MalformedResponse = 4004,

    // Validation errors (6xxx)
    /// Generic validation failure
    ValidationError = 6000,
    /// Price or route distance cannot be used for fare allocation
    InvalidPricingInput = 6002,
}

impl ErrorCode {
    /// Get the numeric code
    #[must_use]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Geocoder",
            6 => "Validation",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit configuration path is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a ridefare.toml file or pass --config with an existing path")
    }

    /// Configuration value rejected by validation
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfigValue, message)
    }

    /// Geocoder failure with a specific code
    pub fn geocoder(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    /// Generic validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Fare allocation refused its inputs
    pub fn invalid_pricing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPricingInput, message)
            .with_suggestion("Enter a price above zero and make sure the route has been measured")
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command succeeded
    pub const SUCCESS: i32 = 0;
    /// Command failed
    pub const FAILURE: i32 = 1;
    /// Input was rejected
    pub const VALIDATION_ERROR: i32 = 2;
    /// Configuration could not be loaded
    pub const CONFIG_ERROR: i32 = 3;
    /// Geocoder could not be reached or refused the request
    pub const GEOCODER_ERROR: i32 = 4;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON parse error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}")).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::RateLimited.to_string(), "E4003");
        assert_eq!(ErrorCode::InvalidPricingInput.to_string(), "E6002");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ProviderUnavailable.category(), "Geocoder");
        assert_eq!(ErrorCode::InvalidPricingInput.category(), "Validation");
    }

    #[test]
    fn test_invalid_pricing_carries_suggestion() {
        let err = Error::invalid_pricing("total price must be positive")
            .with_context("While allocating stopover fares");

        assert_eq!(err.code, ErrorCode::InvalidPricingInput);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_display_includes_context_and_suggestion() {
        let err = Error::geocoder(ErrorCode::RateLimited, "provider answered 429")
            .with_context("search for 'vijayawada'")
            .with_suggestion("Wait a moment and try again");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[E4003] provider answered 429"));
        assert!(rendered.contains("Context: search for 'vijayawada'"));
        assert!(rendered.contains("Suggestion: Wait a moment"));
    }

    #[test]
    fn test_io_not_found_maps_code() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.source.is_some());
    }
}
