// src/radar/utils.rs
//
// Utility functions for radar distance calculations

use crate::config::KM_PER_DEGREE;
use crate::models::GeoPoint;

/// Kilometre offsets of `candidate` relative to `observer` on a flat earth.
/// Returns (delta_lat_km, delta_lng_km). Longitude is scaled by the cosine
/// of the observer's latitude only.
pub fn flat_earth_deltas_km(observer: GeoPoint, candidate: GeoPoint) -> (f64, f64) {
    let delta_lat_km = (candidate.lat() - observer.lat()) * KM_PER_DEGREE;
    let delta_lng_km =
        (candidate.lng() - observer.lng()) * KM_PER_DEGREE * observer.lat().to_radians().cos();
    (delta_lat_km, delta_lng_km)
}

/// Distance used for every radar decision
pub fn flat_earth_distance_km(observer: GeoPoint, candidate: GeoPoint) -> f64 {
    let (delta_lat_km, delta_lng_km) = flat_earth_deltas_km(observer, candidate);
    delta_lat_km.hypot(delta_lng_km)
}

/// Great-circle distance in kilometres, for labels that need a more accurate figure
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = a.lat().to_radians();
    let lat2_rad = b.lat().to_radians();
    let dlat = lat2_rad - lat1_rad;
    let dlon = (b.lng() - a.lng()).to_radians();

    let h =
        (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn test_flat_earth_north_offset() {
        let d = flat_earth_distance_km(point(10.0, -66.0), point(10.09, -66.0));
        assert!((d - 9.99).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let at_equator = flat_earth_distance_km(point(0.0, 0.0), point(0.0, 1.0));
        let at_sixty = flat_earth_distance_km(point(60.0, 0.0), point(60.0, 1.0));
        assert!((at_equator - 111.0).abs() < 1e-9);
        assert!((at_sixty - 55.5).abs() < 1e-6, "got {}", at_sixty);
    }

    #[test]
    fn test_haversine_close_to_flat_earth_for_short_hops() {
        let a = point(10.0, -66.0);
        let b = point(10.05, -65.95);
        let flat = flat_earth_distance_km(a, b);
        let great_circle = haversine_distance_km(a, b);
        assert!((flat - great_circle).abs() / great_circle < 0.01);
        assert_eq!(haversine_distance_km(a, a), 0.0);
    }
}
