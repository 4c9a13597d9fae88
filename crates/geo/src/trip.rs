//! Trip authoring state that reprices on demand.

use crate::{
    Coordinate, PriceAllocation, PricingRequest, Result, SegmentPriceAllocator, StopoverList,
};
use serde::{Deserialize, Serialize};

/// A trip being authored: endpoints, stopovers, total price and route length.
///
/// No prices are stored. [`TripDraft::allocation`] reruns the allocator over
/// the current state every time, so any change to the price, the stopovers or
/// an endpoint is reflected on the next call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDraft {
    origin: Coordinate,
    destination: Coordinate,
    #[serde(default)]
    stopovers: StopoverList,
    #[serde(default)]
    total_price: Option<f64>,
    #[serde(default)]
    route_distance_km: Option<f64>,
    #[serde(skip)]
    allocator: SegmentPriceAllocator,
}

impl TripDraft {
    /// Start a trip between two confirmed points
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            stopovers: StopoverList::new(),
            total_price: None,
            route_distance_km: None,
            allocator: SegmentPriceAllocator::default(),
        }
    }

    /// Use a different allocator (e.g. another minimum fare)
    #[must_use]
    pub fn with_allocator(mut self, allocator: SegmentPriceAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Trip start
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Trip end
    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Move the trip start
    pub fn set_origin(&mut self, origin: Coordinate) {
        self.origin = origin;
    }

    /// Move the trip end
    pub fn set_destination(&mut self, destination: Coordinate) {
        self.destination = destination;
    }

    /// Set the full-route price
    pub fn set_total_price(&mut self, total_price: f64) {
        self.total_price = Some(total_price);
    }

    /// Set the road distance reported by the routing service
    pub fn set_route_distance_km(&mut self, route_distance_km: f64) {
        self.route_distance_km = Some(route_distance_km);
    }

    /// Stopovers in route order
    pub fn stopovers(&self) -> &StopoverList {
        &self.stopovers
    }

    /// Edit the stopovers
    pub fn stopovers_mut(&mut self) -> &mut StopoverList {
        &mut self.stopovers
    }

    /// Current price split, or `None` until both the price and the route
    /// distance are known.
    ///
    /// # Errors
    /// Propagates allocator validation failures, such as a non-positive price.
    pub fn allocation(&self) -> Result<Option<PriceAllocation>> {
        let (Some(total_price), Some(route_distance_km)) = (self.total_price, self.route_distance_km)
        else {
            return Ok(None);
        };

        self.allocator
            .allocate(&PricingRequest {
                total_price,
                route_distance_km,
                origin: self.origin,
                destination: self.destination,
                stopovers: self.stopovers.as_slice(),
            })
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;

    fn hyderabad_to_vijayawada() -> TripDraft {
        TripDraft::new(Coordinate::new(17.3850, 78.4867), Coordinate::new(16.5062, 80.6480))
    }

    #[test]
    fn test_no_allocation_until_priced() {
        let mut trip = hyderabad_to_vijayawada();
        assert_eq!(trip.allocation(), Ok(None));

        trip.set_total_price(600.0);
        assert_eq!(trip.allocation(), Ok(None));

        trip.set_route_distance_km(275.0);
        assert!(trip.allocation().unwrap().is_some());
    }

    #[test]
    fn test_recomputes_after_every_change() {
        let mut trip = hyderabad_to_vijayawada();
        trip.set_total_price(600.0);
        trip.set_route_distance_km(275.0);
        trip.stopovers_mut()
            .add("sur", "Suryapet", Coordinate::new(17.1405, 79.6200))
            .unwrap();

        let before = trip.allocation().unwrap().unwrap();
        assert_eq!(before.segments.len(), 1);

        trip.set_total_price(1200.0);
        let doubled = trip.allocation().unwrap().unwrap();
        assert!(doubled.segments[0].price > before.segments[0].price);

        trip.stopovers_mut()
            .add("kod", "Kodad", Coordinate::new(16.9980, 79.9650))
            .unwrap();
        assert_eq!(trip.allocation().unwrap().unwrap().segments.len(), 2);

        trip.stopovers_mut().remove("sur").unwrap();
        let after = trip.allocation().unwrap().unwrap();
        assert_eq!(after.segments.len(), 1);
        assert_eq!(after.segments[0].stopover_id, "kod");
    }

    #[test]
    fn test_moving_destination_changes_prices() {
        let mut trip = hyderabad_to_vijayawada();
        trip.set_total_price(600.0);
        trip.set_route_distance_km(275.0);
        trip.stopovers_mut()
            .add("sur", "Suryapet", Coordinate::new(17.1405, 79.6200))
            .unwrap();
        let before = trip.allocation().unwrap().unwrap().segments[0].price;

        // Guntur sits a few km closer to Suryapet than Vijayawada
        trip.set_destination(Coordinate::new(16.3067, 80.4365));
        let after = trip.allocation().unwrap().unwrap().segments[0].price;
        assert_ne!(before, after);
    }

    #[test]
    fn test_invalid_price_surfaces() {
        let mut trip = hyderabad_to_vijayawada();
        trip.set_total_price(0.0);
        trip.set_route_distance_km(275.0);
        assert!(matches!(trip.allocation(), Err(GeoError::InvalidPricingInput(_))));
    }
}
