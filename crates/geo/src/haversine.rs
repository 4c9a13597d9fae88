//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Pure and symmetric; coincident points are zero apart.
///
/// # Example
/// ```
/// use ridefare_geo::{haversine_distance, Coordinate};
///
/// let vijayawada = Coordinate::new(16.5062, 80.6480);
/// let guntur = Coordinate::new(16.3067, 80.4365);
///
/// let distance = haversine_distance(&vijayawada, &guntur);
/// assert!((distance - 31.4).abs() < 1.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair outside [0, 1] for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in kilometers between two latitude/longitude pairs in degrees.
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance(&Coordinate::new(lat1, lon1), &Coordinate::new(lat2, lon2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HYDERABAD: Coordinate = Coordinate { latitude: 17.3850, longitude: 78.4867 };
    const CHENNAI: Coordinate = Coordinate { latitude: 13.0827, longitude: 80.2707 };
    const MUMBAI: Coordinate = Coordinate { latitude: 19.0760, longitude: 72.8777 };
    const DELHI: Coordinate = Coordinate { latitude: 28.7041, longitude: 77.1025 };

    #[test]
    fn test_hyderabad_to_chennai() {
        let distance = haversine_distance(&HYDERABAD, &CHENNAI);
        // Expected: ~515 km
        assert!((distance - 515.0).abs() < 10.0, "Hyderabad-Chennai: {}", distance);
    }

    #[test]
    fn test_mumbai_to_delhi() {
        let distance = haversine_distance(&MUMBAI, &DELHI);
        // Expected: ~1,150 km
        assert!((distance - 1150.0).abs() < 20.0, "Mumbai-Delhi: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(haversine_distance(&HYDERABAD, &HYDERABAD), 0.0);
        assert_eq!(distance_km(17.385, 78.4867, 17.385, 78.4867), 0.0);
    }

    #[test]
    fn test_meridian_arc_is_exact() {
        // one degree of latitude along a meridian is R * pi / 180
        let d = distance_km(10.0, 78.0, 11.0, 78.0);
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetry() {
        let d1 = haversine_distance(&HYDERABAD, &CHENNAI);
        let d2 = haversine_distance(&CHENNAI, &HYDERABAD);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_inequality() {
        let direct = haversine_distance(&MUMBAI, &CHENNAI);
        let via = haversine_distance(&MUMBAI, &HYDERABAD) + haversine_distance(&HYDERABAD, &CHENNAI);
        assert!(direct <= via + 1e-9);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_zero_for_same_point(p in coordinate()) {
            prop_assert!(haversine_distance(&p, &p).abs() < 1e-9);
        }

        #[test]
        fn prop_symmetric(a in coordinate(), b in coordinate()) {
            let d1 = haversine_distance(&a, &b);
            let d2 = haversine_distance(&b, &a);
            prop_assert!((d1 - d2).abs() < 1e-6);
        }

        #[test]
        fn prop_bounded_by_half_circumference(a in coordinate(), b in coordinate()) {
            let d = haversine_distance(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        #[test]
        fn prop_triangle_inequality(a in coordinate(), b in coordinate(), c in coordinate()) {
            let direct = haversine_distance(&a, &c);
            let via = haversine_distance(&a, &b) + haversine_distance(&b, &c);
            prop_assert!(direct <= via + 1e-6);
        }
    }
}
