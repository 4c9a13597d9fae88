//! Geocoding and search-as-you-type for ridefare
//!
//! This crate connects the place-matching algorithms in `ridefare-search` to a
//! Nominatim-compatible geocoder.
//!
//! # Features
//!
//! - **Provider pacing**: one request per second by default, callers queue instead of failing
//! - **429 cooldown**: throttled clients back off exponentially and fail fast meanwhile
//! - **Normalized retry**: an empty first search retries once with the normalized spelling
//! - **Debounced suggestions**: keystrokes coalesce, stale responses are dropped
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use ridefare_geocoder::{LocationMatcher, NominatimClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let matcher = LocationMatcher::new(NominatimClient::new()?);
//!
//!     for place in matcher.suggest("Tirupathi").await {
//!         println!("{} ({}, {})", place.display_name, place.lat, place.lon);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod matcher;
pub mod provider;
pub mod session;

pub use client::NominatimClient;
pub use config::GeocoderConfig;
pub use error::{GeocodeError, GeocodeResult};
pub use matcher::LocationMatcher;
pub use provider::Geocoder;
pub use session::{spawn_suggestion_feed, SearchSession, SearchTicket, SuggestionFeed, SuggestionUpdate};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::NominatimClient;
    pub use crate::config::GeocoderConfig;
    pub use crate::error::{GeocodeError, GeocodeResult};
    pub use crate::matcher::LocationMatcher;
    pub use crate::provider::Geocoder;
    pub use crate::session::{spawn_suggestion_feed, SuggestionFeed, SuggestionUpdate};
}
