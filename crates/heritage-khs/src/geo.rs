//! Great-circle distance and the proximity bonus used when ranking details.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Haversine distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Score bonus for a candidate `distance_km` away from the click point.
///
/// Brackets are inclusive upper bounds: 0.5 km → 40, 1 km → 30, 3 km → 15,
/// 5 km → 5, 10 km → 1, beyond → 0.
#[must_use]
pub fn distance_bonus(distance_km: f64) -> u32 {
    match distance_km {
        d if d <= 0.5 => 40,
        d if d <= 1.0 => 30,
        d if d <= 3.0 => 15,
        d if d <= 5.0 => 5,
        d if d <= 10.0 => 1,
        _ => 0,
    }
}
