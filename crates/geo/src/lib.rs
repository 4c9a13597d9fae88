//! Distance and fare allocation for trips with stopovers.
//!
//! This crate provides:
//! - Haversine (great-circle) distance calculations
//! - Ordered stopover lists with add/remove/reorder operations
//! - Distance-proportional allocation of one trip price across stopovers
//! - A trip draft that recomputes every segment price on demand
//!
//! # Example
//!
//! ```
//! use ridefare_geo::{Coordinate, PricingRequest, SegmentPriceAllocator, Waypoint};
//!
//! let origin = Coordinate::new(17.3850, 78.4867);      // Hyderabad
//! let destination = Coordinate::new(16.5062, 80.6480); // Vijayawada
//! let stopovers = vec![Waypoint::new("sur", "Suryapet", 17.1405, 79.6200, 1)];
//!
//! let allocation = SegmentPriceAllocator::default()
//!     .allocate(&PricingRequest {
//!         total_price: 600.0,
//!         route_distance_km: 275.0,
//!         origin,
//!         destination,
//!         stopovers: &stopovers,
//!     })
//!     .unwrap();
//!
//! assert_eq!(allocation.segments.len(), 1);
//! assert!(allocation.segments[0].price >= 50);
//! ```

mod error;
mod haversine;
mod pricing;
mod trip;
mod waypoint;

pub use error::{GeoError, Result};
pub use haversine::{distance_km, haversine_distance, EARTH_RADIUS_KM};
pub use pricing::{PriceAllocation, PricingRequest, PricingSegment, SegmentPriceAllocator, MIN_FARE};
pub use trip::TripDraft;
pub use waypoint::{StopoverList, Waypoint};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to another coordinate in kilometers.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self, other)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}
