//! Great-circle helpers shared by the geo index, the extractor and the penalizer.
//!
//! Points follow the `geo` convention: `x` is longitude, `y` is latitude, both in degrees.

use geo::Point;

use crate::{EARTH_RADIUS_M, Meters};

/// Haversine distance between two latitude/longitude pairs given in degrees
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Meters {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Haversine distance between two `geo` points
pub fn haversine_points(a: &Point<f64>, b: &Point<f64>) -> Meters {
    haversine(a.y(), a.x(), b.y(), b.x())
}

/// Position on the unit sphere. Euclidean (chord) distance between two such
/// positions grows monotonically with the great-circle distance, which lets
/// an R-tree answer haversine nearest-neighbour queries.
pub(crate) fn unit_sphere(point: &Point<f64>) -> [f64; 3] {
    let lat = point.y().to_radians();
    let lon = point.x().to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Squared unit-sphere chord length matching a great-circle distance in meters
pub(crate) fn chord_squared(distance: Meters) -> f64 {
    let half_angle = (distance / EARTH_RADIUS_M / 2.0).min(std::f64::consts::FRAC_PI_2);
    let chord = 2.0 * half_angle.sin();
    chord * chord
}

/// Human readable coordinate label used when no address is known
pub fn describe_coordinates(lat: f64, lon: f64) -> String {
    format!("{lat:.5}, {lon:.5}")
}
