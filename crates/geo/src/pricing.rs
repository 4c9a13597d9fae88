//! Distance-proportional split of one trip price across stopovers.
//!
//! Each stopover is priced for the ride from that stopover to the destination:
//! `round(distance × total_price / route_distance_km)`, never below [`MIN_FARE`].
//!
//! The route length comes from a road router while stopover distances are
//! straight-line haversine, so segment prices slightly undercount winding roads.
//! The two models are mixed as-is and never reconciled here.

use crate::{haversine_distance, Coordinate, GeoError, Result, Waypoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Lowest price any segment can carry, in whole currency units.
pub const MIN_FARE: i64 = 50;

/// Everything needed to price one trip.
#[derive(Debug, Clone, Copy)]
pub struct PricingRequest<'a> {
    /// Price of the whole ride from origin to destination
    pub total_price: f64,
    /// Road distance of the whole route, supplied by a routing service
    pub route_distance_km: f64,
    /// Trip start
    pub origin: Coordinate,
    /// Trip end
    pub destination: Coordinate,
    /// Stopovers in any order; `order` decides the route sequence
    pub stopovers: &'a [Waypoint],
}

/// Price of riding from one stopover to the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSegment {
    /// Id of the stopover this segment starts at
    pub stopover_id: String,
    /// Straight-line distance from the stopover to the destination
    pub distance_to_destination_km: f64,
    /// Rounded, floored price
    pub price: i64,
}

/// Result of one allocation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAllocation {
    /// Full-route price, left unsegmented
    pub total_price: f64,
    /// Route length the rate was derived from
    pub route_distance_km: f64,
    /// `total_price / route_distance_km`
    pub per_km_rate: f64,
    /// One segment per stopover, in route order
    pub segments: Vec<PricingSegment>,
}

impl PriceAllocation {
    /// Segment for the given stopover
    pub fn segment(&self, stopover_id: &str) -> Option<&PricingSegment> {
        self.segments.iter().find(|s| s.stopover_id == stopover_id)
    }
}

/// Derives per-segment prices from a single total price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPriceAllocator {
    min_fare: i64,
}

impl Default for SegmentPriceAllocator {
    fn default() -> Self {
        Self { min_fare: MIN_FARE }
    }
}

impl SegmentPriceAllocator {
    /// Allocator with a custom floor. A floor below [`MIN_FARE`] is raised to it.
    pub fn with_min_fare(min_fare: i64) -> Self {
        Self {
            min_fare: min_fare.max(MIN_FARE),
        }
    }

    /// Floor applied to every segment
    pub fn min_fare(&self) -> i64 {
        self.min_fare
    }

    /// Price every stopover of the request.
    ///
    /// Segments come back sorted by `order`. Each price depends only on that
    /// stopover's own distance to the destination, so reordering stopovers
    /// never changes an individual price.
    ///
    /// # Errors
    /// - [`GeoError::InvalidPricingInput`] when the price or route distance is
    ///   not a positive finite number
    /// - [`GeoError::DuplicateWaypointOrder`] when two stopovers share an order
    /// - [`GeoError::InvalidCoordinate`] for out-of-range endpoints or stopovers
    pub fn allocate(&self, request: &PricingRequest<'_>) -> Result<PriceAllocation> {
        let per_km_rate = per_km_rate(request.total_price, request.route_distance_km)?;

        for (label, point) in [("origin", request.origin), ("destination", request.destination)] {
            if !point.is_valid() {
                return Err(GeoError::InvalidCoordinate(format!(
                    "{label} ({}, {})",
                    point.latitude, point.longitude
                )));
            }
        }

        let mut orders = HashSet::with_capacity(request.stopovers.len());
        for stopover in request.stopovers {
            if !orders.insert(stopover.order) {
                return Err(GeoError::DuplicateWaypointOrder(stopover.order));
            }
            if !stopover.coordinate().is_valid() {
                return Err(GeoError::InvalidCoordinate(format!(
                    "{} ({}, {})",
                    stopover.id, stopover.lat, stopover.lon
                )));
            }
        }

        let straight_line_km = haversine_distance(&request.origin, &request.destination);
        if request.route_distance_km < straight_line_km {
            warn!(
                route_distance_km = request.route_distance_km,
                straight_line_km,
                "Route is shorter than the straight-line distance between its endpoints"
            );
        }

        let mut ordered: Vec<&Waypoint> = request.stopovers.iter().collect();
        ordered.sort_by_key(|w| w.order);

        let segments: Vec<PricingSegment> = ordered
            .into_iter()
            .map(|stopover| {
                let distance = haversine_distance(&stopover.coordinate(), &request.destination);
                PricingSegment {
                    stopover_id: stopover.id.clone(),
                    distance_to_destination_km: distance,
                    price: self.segment_price(distance, per_km_rate),
                }
            })
            .collect();

        debug!(
            per_km_rate,
            segments = segments.len(),
            "Allocated trip price across stopovers"
        );

        Ok(PriceAllocation {
            total_price: request.total_price,
            route_distance_km: request.route_distance_km,
            per_km_rate,
            segments,
        })
    }

    /// `round(distance × rate)`, floored at the minimum fare.
    #[allow(clippy::cast_possible_truncation)]
    pub fn segment_price(&self, distance_km: f64, per_km_rate: f64) -> i64 {
        let raw = (distance_km * per_km_rate).round() as i64;
        raw.max(self.min_fare)
    }
}

fn per_km_rate(total_price: f64, route_distance_km: f64) -> Result<f64> {
    if !total_price.is_finite() || total_price <= 0.0 {
        return Err(GeoError::InvalidPricingInput(format!(
            "total price must be positive, got {total_price}"
        )));
    }
    if !route_distance_km.is_finite() || route_distance_km <= 0.0 {
        return Err(GeoError::InvalidPricingInput(format!(
            "route distance must be positive, got {route_distance_km} km"
        )));
    }
    Ok(total_price / route_distance_km)
}
