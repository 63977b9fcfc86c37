//! Static rule layer: land mask and restricted zones.
//!
//! Rings are given as `[lon, lat]` pairs (x, y order). A point on a polygon
//! boundary is not inside it.

use geo::{Contains, LineString, MultiPolygon, Point, Polygon};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::LatLon;

use super::ObstacleOracle;

/// Named no-go polygon
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    pub name: String,
    /// Exterior ring as `[lon, lat]` pairs
    pub ring: Vec<[f64; 2]>,
}

/// Serializable description of a rule layer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Land polygons as `[lon, lat]` rings
    #[serde(default)]
    pub land: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub restricted_zones: Vec<RestrictedZone>,
}

/// Land mask plus restricted zones, combined with logical OR.
#[derive(Clone, Debug)]
pub struct RuleLayer {
    land: MultiPolygon<f64>,
    restricted: Vec<(String, Polygon<f64>)>,
}

impl Default for RuleLayer {
    fn default() -> Self {
        Self {
            land: MultiPolygon::new(Vec::new()),
            restricted: Vec::new(),
        }
    }
}

impl RuleLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a spec. Rings with fewer than three points are skipped.
    pub fn from_spec(spec: &RuleSpec) -> Self {
        let mut layer = Self::new();
        for ring in &spec.land {
            layer = layer.with_land(ring);
        }
        for zone in &spec.restricted_zones {
            layer = layer.with_restricted_zone(&zone.name, &zone.ring);
        }
        layer
    }

    /// Add a land polygon
    pub fn with_land(mut self, ring: &[[f64; 2]]) -> Self {
        if let Some(polygon) = polygon_from_ring(ring) {
            self.land.0.push(polygon);
        } else {
            warn!("[RuleLayer] skipping land ring with {} points", ring.len());
        }
        self
    }

    /// Add a named restricted zone
    pub fn with_restricted_zone(mut self, name: &str, ring: &[[f64; 2]]) -> Self {
        if let Some(polygon) = polygon_from_ring(ring) {
            self.restricted.push((name.to_string(), polygon));
        } else {
            warn!(
                "[RuleLayer] skipping zone '{}' with {} points",
                name,
                ring.len()
            );
        }
        self
    }

    /// Whether no polygons are loaded
    pub fn is_empty(&self) -> bool {
        self.land.0.is_empty() && self.restricted.is_empty()
    }

    pub fn is_land(&self, at: LatLon) -> bool {
        self.land.contains(&to_point(at))
    }

    /// Name of the first restricted zone containing `at`
    pub fn restricted_zone_at(&self, at: LatLon) -> Option<&str> {
        let point = to_point(at);
        self.restricted
            .iter()
            .find(|(_, polygon)| polygon.contains(&point))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_restricted(&self, at: LatLon) -> bool {
        self.restricted_zone_at(at).is_some()
    }
}

impl ObstacleOracle for RuleLayer {
    fn is_blocked(&self, at: LatLon) -> bool {
        self.is_land(at) || self.is_restricted(at)
    }
}

fn to_point(at: LatLon) -> Point<f64> {
    Point::new(at.lon, at.lat)
}

fn polygon_from_ring(ring: &[[f64; 2]]) -> Option<Polygon<f64>> {
    if ring.len() < 3 {
        return None;
    }
    let exterior: LineString<f64> = ring.iter().map(|&[x, y]| (x, y)).collect::<Vec<_>>().into();
    Some(Polygon::new(exterior, Vec::new()))
}
