//! Core utilities shared by the ridefare crates
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults for every section
//! - **Rate limiting**: token bucket pacing for third-party providers
//! - **Backoff**: exponential delay calculation for throttled providers
//!
//! # Example
//!
//! ```rust,no_run
//! use ridefare_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! println!("geocoder: {}", config.schema.geocoder.base_url);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::RetryConfig;
}
