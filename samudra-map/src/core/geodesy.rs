//! Geodetic positions and the haversine distance.
//!
//! Every geodetic distance in the crate (nearest-node search, edge weights,
//! heuristics, obstacle thresholds) goes through [`haversine_km`].

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Geodetic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude (degrees, positive north)
    pub lat: f64,
    /// Longitude (degrees, positive east)
    pub lon: f64,
}

impl LatLon {
    /// Create a new position
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another position in kilometers
    #[inline]
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Great-circle distance between two points on a sphere of radius
/// [`EARTH_RADIUS_KM`].
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
