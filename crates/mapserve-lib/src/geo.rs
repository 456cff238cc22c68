//! Spherical geometry helpers.
//!
//! Coordinates are plain degrees of longitude and latitude. None of these
//! functions validate their inputs: NaN or out-of-range coordinates propagate
//! into the result, and callers are responsible for supplying finite values.

use serde::{Deserialize, Serialize};

/// Spherical Earth radius used for all distances, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to another point in miles.
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(self.lon, self.lat, other.lon, other.lat)
    }

    /// Initial bearing toward another point in degrees.
    pub fn bearing_to(&self, other: &Self) -> f64 {
        bearing(self.lon, self.lat, other.lon, other.lat)
    }
}

/// Haversine great-circle distance between two positions, in miles.
pub fn distance(lon_v: f64, lat_v: f64, lon_w: f64, lat_w: f64) -> f64 {
    let phi1 = lat_v.to_radians();
    let phi2 = lat_w.to_radians();
    let dphi = (lat_w - lat_v).to_radians();
    let dlambda = (lon_w - lon_v).to_radians();

    let half_dphi = (dphi / 2.0).sin();
    let half_dlambda = (dlambda / 2.0).sin();
    let a = half_dphi * half_dphi + phi1.cos() * phi2.cos() * half_dlambda * half_dlambda;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Initial bearing in degrees, in `(-180, 180]`, from the first position toward
/// the second along the great circle joining them.
pub fn bearing(lon_v: f64, lat_v: f64, lon_w: f64, lat_w: f64) -> f64 {
    let phi1 = lat_v.to_radians();
    let phi2 = lat_w.to_radians();
    let dlambda = (lon_w - lon_v).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    y.atan2(x).to_degrees()
}

/// Signed turn from `heading` to `next_bearing`, folded into `[-180, 180)`.
///
/// Negative values turn left, positive values turn right.
pub fn relative_bearing(heading: f64, next_bearing: f64) -> f64 {
    let mut relative = (next_bearing - heading) % 360.0;
    if relative < -180.0 {
        relative += 360.0;
    }
    if relative >= 180.0 {
        relative -= 360.0;
    }
    relative
}
