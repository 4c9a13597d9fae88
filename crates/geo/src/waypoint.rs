//! Stopovers between a trip's origin and destination.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named point on the route. Origin and destination are not stored as waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Position along the route, strictly increasing from origin to destination
    pub order: i32,
}

impl Waypoint {
    /// Create a waypoint
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            order,
        }
    }

    /// Position of the waypoint
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Ordered stopovers of a trip being authored.
///
/// Ids are unique and `order` runs `1..=len` in list order after every edit,
/// so the chain origin → stopovers → destination never has gaps or ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopoverList {
    stopovers: Vec<Waypoint>,
}

impl StopoverList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored waypoints, sorted by their `order`.
    ///
    /// # Errors
    /// Fails on duplicate ids, duplicate orders or out-of-range coordinates.
    pub fn from_waypoints(mut waypoints: Vec<Waypoint>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut orders = HashSet::new();
        for w in &waypoints {
            validate_coordinate(w)?;
            if !ids.insert(w.id.as_str()) {
                return Err(GeoError::DuplicateWaypointId(w.id.clone()));
            }
            if !orders.insert(w.order) {
                return Err(GeoError::DuplicateWaypointOrder(w.order));
            }
        }

        waypoints.sort_by_key(|w| w.order);
        let mut list = Self { stopovers: waypoints };
        list.renumber();
        Ok(list)
    }

    /// Append a stopover just before the destination.
    ///
    /// # Errors
    /// Fails when the id is taken or the coordinate is out of range.
    pub fn add(&mut self, id: impl Into<String>, name: impl Into<String>, at: Coordinate) -> Result<&Waypoint> {
        let index = self.stopovers.len();
        self.insert_at(index, id, name, at)
    }

    /// Insert a stopover at `index` (clamped to the end of the list).
    ///
    /// # Errors
    /// Fails when the id is taken or the coordinate is out of range.
    pub fn insert_at(
        &mut self,
        index: usize,
        id: impl Into<String>,
        name: impl Into<String>,
        at: Coordinate,
    ) -> Result<&Waypoint> {
        let waypoint = Waypoint::new(id, name, at.latitude, at.longitude, 0);
        validate_coordinate(&waypoint)?;
        if self.position(&waypoint.id).is_some() {
            return Err(GeoError::DuplicateWaypointId(waypoint.id));
        }

        let index = index.min(self.stopovers.len());
        self.stopovers.insert(index, waypoint);
        self.renumber();
        Ok(&self.stopovers[index])
    }

    /// Remove a stopover by id.
    ///
    /// # Errors
    /// Fails when no stopover has this id.
    pub fn remove(&mut self, id: &str) -> Result<Waypoint> {
        let index = self
            .position(id)
            .ok_or_else(|| GeoError::UnknownWaypoint(id.to_string()))?;
        let removed = self.stopovers.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move a stopover to `index` (clamped to the end of the list).
    ///
    /// # Errors
    /// Fails when no stopover has this id.
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<()> {
        let from = self
            .position(id)
            .ok_or_else(|| GeoError::UnknownWaypoint(id.to_string()))?;
        let waypoint = self.stopovers.remove(from);
        let index = index.min(self.stopovers.len());
        self.stopovers.insert(index, waypoint);
        self.renumber();
        Ok(())
    }

    /// Stopover with this id
    pub fn get(&self, id: &str) -> Option<&Waypoint> {
        self.stopovers.iter().find(|w| w.id == id)
    }

    /// Stopovers in route order
    pub fn as_slice(&self) -> &[Waypoint] {
        &self.stopovers
    }

    /// Iterate stopovers in route order
    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.stopovers.iter()
    }

    /// Number of stopovers
    pub fn len(&self) -> usize {
        self.stopovers.len()
    }

    /// True when the trip goes straight from origin to destination
    pub fn is_empty(&self) -> bool {
        self.stopovers.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.stopovers.iter().position(|w| w.id == id)
    }

    fn renumber(&mut self) {
        for (order, waypoint) in (1..).zip(self.stopovers.iter_mut()) {
            waypoint.order = order;
        }
    }
}

impl<'de> Deserialize<'de> for StopoverList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let waypoints = Vec::<Waypoint>::deserialize(deserializer)?;
        StopoverList::from_waypoints(waypoints).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a StopoverList {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_coordinate(w: &Waypoint) -> Result<()> {
    if w.coordinate().is_valid() {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate(format!(
            "{} ({}, {}) is outside the valid latitude/longitude range",
            w.id, w.lat, w.lon
        )))
    }
}
