//! The seam between place search and whatever answers geocoding requests

use crate::error::GeocodeResult;
use ridefare_geo::Coordinate;
use ridefare_search::Candidate;
use std::future::Future;
use std::sync::Arc;

/// Forward and reverse geocoding.
///
/// Futures are `Send` so searches can run on spawned tasks.
pub trait Geocoder: Send + Sync {
    /// Candidates for a free-text place query, in provider order
    fn search(&self, query: &str) -> impl Future<Output = GeocodeResult<Vec<Candidate>>> + Send;

    /// The place at a coordinate, for map-drag flows
    fn reverse(&self, at: Coordinate) -> impl Future<Output = GeocodeResult<Candidate>> + Send;
}

impl<G: Geocoder> Geocoder for Arc<G> {
    fn search(&self, query: &str) -> impl Future<Output = GeocodeResult<Vec<Candidate>>> + Send {
        (**self).search(query)
    }

    fn reverse(&self, at: Coordinate) -> impl Future<Output = GeocodeResult<Candidate>> + Send {
        (**self).reverse(at)
    }
}
